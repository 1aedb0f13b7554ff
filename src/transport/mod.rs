/// Filesystem transport for collecting statistics exports.
pub mod fs;
/// HTTP transport shared by the mapping loader, directory, and reference fetch.
pub mod http;
