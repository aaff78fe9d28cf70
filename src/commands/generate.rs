//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::content::loader::ContentLoader;
use crate::generator::Generator;
use crate::Polyblog;

/// Generate the static site
pub fn run(app: &Polyblog) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(app);
    let posts = loader.load_posts()?;
    let authors = loader.load_author_pages()?;

    tracing::info!(
        "Loaded {} posts and {} author pages",
        posts.len(),
        authors.len()
    );

    let generator = Generator::new(app)?;
    generator.generate(&posts, &authors)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Watch for file changes and regenerate
pub async fn watch(app: &Polyblog) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(app.source_dir.as_ref(), notify::RecursiveMode::Recursive)?;
    watcher.watch(
        Path::new(&app.base_dir.join("_config.yml")),
        notify::RecursiveMode::NonRecursive,
    )?;

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    // Debounce events
    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    if let Err(e) = run(app) {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}
