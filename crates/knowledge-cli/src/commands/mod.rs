pub mod check;
pub mod init;
pub mod refresh;
pub mod update;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold .knowledge/ in the current project
    Init(init::InitArgs),
    /// Update agent commands and templates without touching user content
    Update,
    /// Regenerate snapshot.md and rebuild index.yaml
    Refresh,
    /// Verify freshness of all knowledge guides
    Check,
}
