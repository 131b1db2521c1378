pub struct Config {
    /// Suppresses the banner printed before a command runs.
    pub no_banner: bool,
    /// Output verbosity reduction.
    ///
    /// `0` prints everything, `1` drops headers and decoration, `2` only prints the summary.
    pub quiet: u8,
}
