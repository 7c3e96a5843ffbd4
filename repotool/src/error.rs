#[derive(Debug, thiserror::Error)]
pub enum Error {
    // config
    #[error("failed to load Testrepo.toml")]
    Config,

    // ping
    #[error("failed to create HTTP client")]
    HttpClient,
    #[error("GET `{0}` failed")]
    Request(String),
    #[error("failed to print ping result")]
    PingOutput,

    // junit
    #[error("failed to compile plenary output patterns")]
    Patterns,
    #[error("failed to read plenary test output")]
    ReadInput,
    #[error("failed to write JUnit XML report")]
    WriteReport,

    // stdoutinfo
    #[error("failed to get stdout info")]
    StdoutInfo,
}
