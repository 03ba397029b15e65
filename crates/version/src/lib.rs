use git_version::git_version;

lazy_static::lazy_static! {
    /// [`VERSION`] without the client prefix, as shown by `proposer --version`.
    pub static ref SHORT_VERSION: String = VERSION.replace("Proposer/", "");
}

/// Version of this build of the proposer, recorded in every proposal it writes.
///
/// A plus-sign (`+`) is appended to the git commit if the tree is dirty.
/// Commit hash is omitted if the sources don't include git information.
///
/// ## Example
///
/// `Proposer/v0.1.0-67da032+`
pub const VERSION: &str = git_version!(
    args = [
        "--always",
        "--dirty=+",
        "--abbrev=7",
        // NOTE: using --match instead of --exclude for compatibility with old Git
        "--match=thiswillnevermatchlol"
    ],
    prefix = "Proposer/v0.1.0-",
    fallback = "Proposer/v0.1.0"
);
