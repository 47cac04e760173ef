/// How multi-column partition identifiers are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierMode {
    /// Hash of the binary field encodings, rendered as fixed-width hex.
    #[default]
    Hashed,
    /// Integral values joined with `-`. Tables created before hashed
    /// identifiers existed keep this naming so old parts stay addressable.
    Legacy,
}

/// Per-table settings for partition handling
#[derive(Debug, Clone, Default)]
pub struct StorageSettings {
    /// Identifier rendering for multi-column keys (default: Hashed)
    pub identifier_mode: IdentifierMode,

    /// Evaluate the partition key with `moduloLegacy` in place of `modulo`
    /// (default: false)
    pub legacy_modulo_key: bool,

    /// Settings for files written into new parts
    pub write: WriteSettings,
}

/// Settings for the part file writer
#[derive(Debug, Clone)]
pub struct WriteSettings {
    /// Buffer size for part file writes (default: 64KB)
    pub buffer_size: usize,

    /// fsync the file before it is renamed into place (default: false)
    pub fsync: bool,
}

/// How dates are rendered on the text path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `'2023-09-15'`
    #[default]
    Iso,
    /// `20230915`
    Compact,
}

/// Formatting options for the human-readable partition rendering
#[derive(Debug, Clone, Default)]
pub struct FormatSettings {
    pub date_style: DateStyle,
}

/// Settings consulted while evaluating key expressions
#[derive(Debug, Clone, Default)]
pub struct EvalSettings {
    /// Accept Nullable columns in a partition key (default: false)
    pub allow_nullable_key: bool,
}

impl Default for WriteSettings {
    fn default() -> Self {
        Self {
            buffer_size: 64 * 1024, // 64KB
            fsync: false,
        }
    }
}

impl StorageSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set identifier rendering mode
    pub fn identifier_mode(mut self, mode: IdentifierMode) -> Self {
        self.identifier_mode = mode;
        self
    }

    /// Evaluate partition keys with the legacy modulo semantics
    pub fn legacy_modulo_key(mut self, enabled: bool) -> Self {
        self.legacy_modulo_key = enabled;
        self
    }

    /// Configure part file writes
    pub fn write(mut self, settings: WriteSettings) -> Self {
        self.write = settings;
        self
    }
}

impl WriteSettings {
    /// Set write buffer size
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Enable fsync before finishing a file
    pub fn fsync(mut self, enabled: bool) -> Self {
        self.fsync = enabled;
        self
    }
}

impl FormatSettings {
    /// Set date rendering style
    pub fn date_style(mut self, style: DateStyle) -> Self {
        self.date_style = style;
        self
    }
}

impl EvalSettings {
    /// Allow Nullable partition key columns
    pub fn allow_nullable_key(mut self, allowed: bool) -> Self {
        self.allow_nullable_key = allowed;
        self
    }
}
