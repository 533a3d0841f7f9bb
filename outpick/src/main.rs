#![warn(clippy::pedantic)]

use outpick::{canvas, compositor, global};
use outpick_core::resource::ImageHandle;

use anyhow::Result as AnyResult;

/// Until a hosting shell provides measured bounds, compose on a fixed square
/// surface.
const CANVAS_DIMENSION: f32 = 1080.0;

/// Resolves handles that are paths on the local filesystem.
struct FileResolver;
impl compositor::ResolveImage for FileResolver {
    fn resolve(&self, handle: &ImageHandle) -> Option<image::RgbaImage> {
        match image::open(handle.as_str()) {
            Ok(decoded) => Some(decoded.to_rgba8()),
            Err(e) => {
                log::error!("failed to open image {handle}: {e:#}");
                None
            }
        }
    }
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let preferences = global::preferences::Preferences::get();
    if preferences.did_fail_to_load() {
        log::warn!("Composing with default preferences.");
    }
    if let Err(e) = preferences.save() {
        log::warn!("Failed to save preferences:\n{e:?}");
    }

    // Args are a simple list of image paths to compose.
    // Paths are OsStrings, let the system handle character encoding restrictions.
    let paths: Vec<std::path::PathBuf> = std::env::args_os().skip(1).map(Into::into).collect();
    if paths.is_empty() {
        anyhow::bail!("no images to compose");
    }

    let mut canvas = canvas::Canvas::new([CANVAS_DIMENSION; 2], preferences.to_options())?;
    // Every layer spawns centered; stagger them down the diagonal so each one
    // stays visible in the output.
    for (index, path) in paths.iter().enumerate() {
        let handle = ImageHandle::new(path.to_string_lossy())?;
        let id = canvas.add_layer(handle);
        #[allow(clippy::cast_precision_loss)]
        let stagger = 48.0 * index as f32;
        canvas.session_mut().translate_layer(id, [stagger, stagger]);
    }

    let flattened = canvas.flatten(&FileResolver)?;
    let capped = compositor::snapshot(&flattened, preferences.snapshot_max_dim);
    capped.save("outfit.png")?;
    log::info!("Wrote outfit.png ({}x{})", capped.width(), capped.height());
    Ok(())
}
