/// Per-invocation compile switches.
///
/// Built once per batch call or watch-triggered rebuild and dropped after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileOptions {
    /// Uncompressed, annotated output instead of compressed output.
    pub debug: bool,
    /// Rebuild everything. Every pass is currently a full rebuild.
    pub force: bool,
}

impl CompileOptions {
    /// Compressed output for deployment.
    pub const RELEASE: Self = Self {
        debug: false,
        force: false,
    };

    /// Readable output with source annotations.
    pub const DEBUG: Self = Self {
        debug: true,
        force: false,
    };

    #[inline]
    pub const fn new(debug: bool, force: bool) -> Self {
        Self { debug, force }
    }

    /// Label used in logs and `$ASSETS_DEBUG`.
    #[inline]
    pub const fn mode_name(&self) -> &'static str {
        if self.debug { "debug" } else { "release" }
    }
}
