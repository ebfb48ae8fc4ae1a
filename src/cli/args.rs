use clap::Args;
use dewey_core::recommend::{Gate, DEFAULT_MIN_DAYS, DEFAULT_MIN_READS};

/// Data-sufficiency thresholds for recommendations. Zero disables a gate.
#[derive(Args, Debug, Clone, Copy)]
pub struct GateArgs {
    /// Minimum total reads before recommending anything
    #[arg(long, default_value_t = DEFAULT_MIN_READS)]
    pub min_reads: u64,

    /// Minimum days between the first and last recorded read
    #[arg(long, default_value_t = DEFAULT_MIN_DAYS)]
    pub min_days: i64,
}

impl GateArgs {
    pub fn gate(&self) -> Gate {
        Gate {
            min_reads: self.min_reads,
            min_days: self.min_days,
        }
    }
}
