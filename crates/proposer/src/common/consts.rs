/// Exit code when a proposal violates the policy.
pub const EXIT_POLICY_VIOLATION: i32 = 1;

/// Exit code when the environment or configuration is broken.
pub const EXIT_SYSTEM_ERROR: i32 = 2;

pub const DEFAULT_POLICY_PATH: &str = "policy/deployment.rego";
