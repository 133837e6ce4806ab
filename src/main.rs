//! # picturebot CLI
//!
//! Command-line interface for the picture library.
//!
//! ## Usage
//! ```bash
//! picturebot create "Alps 2024" --kind album --source /media/card/DCIM
//! picturebot tree --output json
//! ```

mod cli;

use picturebot::Result;

fn main() -> Result<()> {
    cli::run()
}
