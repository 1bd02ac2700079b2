use crate::error::Result;
use crate::version;

pub fn execute() -> Result<()> {
    println!("{}", version::display());
    Ok(())
}
