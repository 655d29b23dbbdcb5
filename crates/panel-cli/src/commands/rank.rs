//! Print the precedence rank of a directory

use std::path::Path;

use panel_extensions::rank_dir;

use crate::error::Result;

/// Human label for a rank value.
pub fn rank_label(rank: u8) -> &'static str {
    match rank {
        5 => "backend application install tree",
        4 => "workspace application install tree",
        3 => "parent install tree",
        2 => "global install tree",
        _ => "other location",
    }
}

/// Run the rank command
pub fn run_rank(path: &Path) -> Result<()> {
    let rank = rank_dir(path);
    println!("{} ({})", rank, rank_label(rank));
    Ok(())
}
