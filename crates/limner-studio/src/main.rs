//! Sample sketches for the limner engine.
//!
//! `limner-studio [cube|circles|camera]` (default `cube`). The backend and
//! report level follow `LIMNER_BACKEND` / `LIMNER_REPORT`, so e.g.
//! `LIMNER_BACKEND=headless LIMNER_FRAMES=120 limner-studio` runs without
//! a window.

mod sketches;

use anyhow::Context;
use limner_engine::prelude::*;

fn main() -> anyhow::Result<()> {
    let name = std::env::args().nth(1).unwrap_or_else(|| "cube".to_string());
    let sketch = sketches::by_name(&name)
        .with_context(|| format!("unknown sketch {name:?} (available: {})", sketches::NAMES.join(", ")))?;

    let config = LaunchConfig::from_env()?.with_title(format!("limner studio · {name}"));
    launch(sketch, config)
}
