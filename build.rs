use anyhow::Result;
use vergen::EmitBuilder;

fn main() -> Result<()> {
    // Shown next to the package version in `--debug` runs
    EmitBuilder::builder().git_sha(true).git_dirty(false).emit()?;
    Ok(())
}
