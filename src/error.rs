//! Error types for regbind
//!
//! Every error in this crate is fatal to the current code-generation pass.
//! The inputs of the allocator are compiler-internal, so an error always
//! points at a defect in an upstream stage (an unlowered type reaching the
//! backend, an emitter consuming a value it never allocated, ...).

use thiserror::Error;

/// Register allocation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Type dispatch errors
    /// A type category the allocator cannot place into registers
    ///
    /// **Triggered by:** allocating a value of type `void` or an unlowered view
    /// **Prevention:** lower views to pointer/length structures before codegen
    #[error("Unsupported type for register allocation: {ty}")]
    UnsupportedType {
        /// Rendering of the offending type
        ty: String,
    },

    /// The target resolver has no register description for a type
    #[error("Target cannot describe type {ty}: {reason}")]
    UnsupportedDescription {
        /// Rendering of the offending type
        ty: String,
        /// Why the target rejected it
        reason: String,
    },

    // Binding errors
    /// A value was loaded or freed without a live binding
    ///
    /// **Triggered by:** the emitter consuming a value it never allocated,
    /// or consuming it after it was freed
    #[error("Invalid code generation: value {value} has no register binding")]
    MissingBinding {
        /// Rendering of the value (after alias resolution)
        value: String,
    },

    /// A binding exists but holds a different register variant than requested
    #[error("Invalid code generation: value {value} is bound to a {found} register, expected {expected}")]
    UnexpectedRegister {
        /// Rendering of the value
        value: String,
        /// Requested register variant
        expected: &'static str,
        /// Variant actually bound
        found: &'static str,
    },

    /// Creating the alias would make a value resolve to itself
    #[error("Alias of {value} to {target} would create a cycle")]
    AliasCycle {
        /// Aliased value
        value: String,
        /// Requested alias target
        target: String,
    },

    // Target errors
    /// A bounded register file ran out of registers
    #[error("Register file exhausted: no free {kind} register (capacity {capacity})")]
    RegisterFileExhausted {
        /// Register kind that ran out
        kind: String,
        /// Number of registers of that kind
        capacity: u32,
    },

    /// A register was released that the target never handed out
    #[error("Invalid free of register {register}")]
    InvalidFree {
        /// Rendering of the register
        register: String,
    },

    // Diagnostics
    /// Rendering diagnostics failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// General code generation failure
    #[error("Code generation error: {0}")]
    CodegenError(String),
}

impl Error {
    /// Create a code generation error with a message
    pub fn codegen(msg: impl Into<String>) -> Self {
        Error::CodegenError(msg.into())
    }

    /// Whether this error indicates a defect in the compiler itself rather
    /// than a limit of the target (such as an exhausted register file)
    pub fn is_internal(&self) -> bool {
        !matches!(
            self,
            Error::RegisterFileExhausted { .. } | Error::Serialization(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type for regbind operations
pub type Result<T> = std::result::Result<T, Error>;
