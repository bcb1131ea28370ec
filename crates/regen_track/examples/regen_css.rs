//! Regenerates a derived file only when its source changed or the derived
//! file is missing.
//!
//! Run it twice: the first invocation "compiles" the stylesheet, the second
//! finds nothing to do. Delete the generated file (or edit the source) and
//! the action fires again.
//!
//! ```text
//! cargo run --example regen_css
//! ```

use regen_track::{ChangeTracker, Outcome};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join("regen_css_demo");
    std::fs::create_dir_all(&dir)?;

    let source = dir.join("style.scss");
    let sidecar = dir.join("style.scss.sha256");
    let output = dir.join("style.css");
    if !source.exists() {
        std::fs::write(&source, "body { color: black; }\n")?;
    }

    let outcome = ChangeTracker::new()
        .changed(&source, &sidecar)
        .missing(&output)
        .execute(|| -> std::io::Result<()> {
            println!("regenerating {}", output.display());
            std::fs::write(&output, "body{color:black}\n")
        })?;

    match outcome {
        Outcome::Executed => println!("source changed or output was missing; regenerated"),
        Outcome::Unchanged => println!("nothing to do"),
        Outcome::ActionFailed => println!("regeneration failed; will retry next run"),
    }
    Ok(())
}
