use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::LaunchConfig;
use crate::core::Processor;
use crate::scheduler::{Poll, RedrawAction};

/// Runs a started processor without a window.
///
/// Stops after `config.headless_frames` shown frames (draws plus replays),
/// or as soon as the scheduler has nothing left to do.
pub fn run_headless(mut processor: Processor, config: &LaunchConfig) -> Result<()> {
    let limit = config.headless_frames;
    let mut shown = 0u64;

    while limit.is_none_or(|n| shown < n) {
        let now = Instant::now();
        match processor.poll(now) {
            Poll::Redraw => {}
            Poll::WaitUntil(deadline) => {
                std::thread::sleep(deadline.saturating_duration_since(now));
                continue;
            }
            Poll::Idle => break,
        }

        let action = processor
            .on_redraw_requested(Instant::now())
            .with_context(|| format!("draw failed on frame {}", processor.frame_count() + 1))?;
        if action != RedrawAction::Skip {
            shown += 1;
        }
    }

    let scheduler = processor.scheduler();
    log::info!(
        "headless run finished: {} frames shown, {} draws, {} replays",
        shown,
        scheduler.draws(),
        scheduler.replays()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::backend::RecordingRenderer;
    use crate::context::DrawingContext;
    use crate::core::Sketch;
    use crate::error::{DrawError, LogicError};
    use crate::logging::ReportPolicy;

    fn started(sketch: Sketch, rate: f32) -> Processor {
        let ctx = DrawingContext {
            frame_rate: rate,
            ..DrawingContext::default()
        };
        let mut p = Processor::new(sketch, ctx, Box::new(RecordingRenderer::new(100, 100)), ReportPolicy::default());
        p.start(Instant::now()).unwrap();
        p
    }

    fn config(frames: Option<u64>) -> LaunchConfig {
        LaunchConfig {
            headless_frames: frames,
            ..LaunchConfig::default()
        }
    }

    #[test]
    fn continuous_sketch_stops_at_frame_cap() {
        let draws = Rc::new(Cell::new(0));
        let counter = draws.clone();
        let sketch = Sketch::new().setup(|_| Ok(())).draw(move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        run_headless(started(sketch, 1000.0), &config(Some(5))).unwrap();
        assert_eq!(draws.get(), 5);
    }

    #[test]
    fn single_shot_sketch_ends_when_idle() {
        let draws = Rc::new(Cell::new(0));
        let counter = draws.clone();
        let sketch = Sketch::new()
            .setup(|g| {
                g.no_loop();
                Ok(())
            })
            .draw(move |_| {
                counter.set(counter.get() + 1);
                Ok(())
            });

        run_headless(started(sketch, 60.0), &config(None)).unwrap();
        assert_eq!(draws.get(), 1);
    }

    #[test]
    fn draw_errors_end_the_run() {
        let sketch = Sketch::new().setup(|_| Ok(())).draw(|g| g.end_shape(crate::shape::CloseMode::Open));
        let err = run_headless(started(sketch, 1000.0), &config(Some(3))).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DrawError>(),
            Some(&DrawError::Logic(LogicError::NoOpenShape("end_shape")))
        );
    }
}
