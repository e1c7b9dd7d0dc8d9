// Error codes implementation
// Standardized error codes for command-line and service output

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const INVALID_FORMAT: &str = "VALIDATION_1003";
}

pub mod config {
    pub const INVALID_CONFIGURATION: &str = "CONFIG_2001";
}

pub mod model {
    pub const MODEL_UNAVAILABLE: &str = "MODEL_3001";
}

pub mod system {
    pub const LOGGING_INIT_FAILED: &str = "SYS_5001";
    pub const IO_FAILURE: &str = "SYS_5002";
    pub const INTERNAL: &str = "SYS_5999";
}
