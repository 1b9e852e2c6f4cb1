use std::path::Path;

use spellfloat_core::assets::missing_icons;
use spellfloat_core::{
    Event, EventBatch, PatternTable, classify, group_events, settings, spawn_engine, verify_assets,
};
use spellfloat_overlay::{Compositor, spawn_render_loop};
use spellfloat_types::OverlaySettings;
use spellfloat_types::formatting::{format_amount, format_total};

/// Run the overlay until Ctrl-C.
pub async fn run(settings: OverlaySettings) -> Result<(), String> {
    verify_assets(&settings).map_err(|e| e.to_string())?;

    let compositor = Compositor::new();
    let surface = compositor.clone();
    let engine = spawn_engine(&settings, move |_| surface).map_err(|e| e.to_string())?;
    let render = spawn_render_loop(compositor, engine.sender(), |items| {
        for item in items {
            tracing::trace!(
                text = %item.text,
                left = item.left,
                top = item.top,
                opacity = item.opacity,
                "draw"
            );
        }
    });

    tracing::info!(
        log = %settings.log_file.display(),
        rules = settings.rules.len(),
        "overlay running, press Ctrl-C to stop"
    );
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C, shutting down");
    }

    tracing::info!("shutting down");
    render.stop();
    engine.shutdown().await;
    Ok(())
}

/// Write default settings to `path`.
pub fn init(path: &Path, force: bool) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    settings::save(path, &OverlaySettings::default()).map_err(|e| e.to_string())?;
    println!("Wrote default settings to {}", path.display());
    Ok(())
}

/// Validate rules and assets, optionally classifying a sample log.
pub fn check(settings: &OverlaySettings, sample: Option<&Path>) -> Result<(), String> {
    let table = PatternTable::new(&settings.rules);
    let mut problems = 0;

    println!("{} of {} rules compiled", table.len(), settings.rules.len());
    for rejected in table.rejected() {
        println!("  rejected {}: {}", rejected.name, rejected.reason);
        problems += 1;
    }

    if !settings.font_file.is_file() {
        println!("  missing font: {}", settings.font_file.display());
        problems += 1;
    }
    for (spell, icon) in missing_icons(settings) {
        println!("  missing icon for {spell}: {}", icon.display());
        problems += 1;
    }

    if let Some(sample) = sample {
        let bytes = std::fs::read(sample).map_err(|e| format!("{}: {e}", sample.display()))?;
        let batches = classify_sample(&table, &String::from_utf8_lossy(&bytes));
        println!("\n{} group(s) in {}", batches.len(), sample.display());
        for batch in &batches {
            print_batch(batch);
        }
    }

    match problems {
        0 => Ok(()),
        n => Err(format!("{n} problem(s) found")),
    }
}

/// Classify and group a whole log text as one batch
fn classify_sample(table: &PatternTable, text: &str) -> Vec<EventBatch> {
    let lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    group_events(classify(table, lines))
}

fn print_batch(batch: &EventBatch) {
    println!("[{}] {}", batch.key.category, batch.key.subject);
    for event in &batch.events {
        match event {
            Event::Damage { spell, amount, .. } => {
                println!("    {spell}: {}", format_amount(*amount))
            }
            Event::Special { spell, message, .. } => println!("    {spell}: {message}"),
        }
    }
    if let Some(total) = batch.total_damage() {
        println!("    {}", format_total(&batch.key.subject, total));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");

        init(&path, false).unwrap();
        assert!(init(&path, false).is_err());
        assert!(init(&path, true).is_ok());
        assert_eq!(settings::load(&path).unwrap(), OverlaySettings::default());
    }

    #[test]
    fn test_sample_is_grouped_by_subject() {
        let table = PatternTable::new(&OverlaySettings::default().rules);
        let text = "\
            Ogre has taken 100 damage from your Bond of Death.\n\
            \n\
            nothing to see here\n\
            Ogre has taken 250 damage from your Vampiric Curse.\n\
            You feel the spirit of wolf enter you.\n";

        let batches = classify_sample(&table, text);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].key.subject, "Ogre");
        assert_eq!(batches[0].total_damage(), Some(350));
        assert_eq!(batches[1].key.category, "healing");
        assert_eq!(batches[1].key.subject, "Unknown");
    }

    #[test]
    fn test_check_reports_missing_assets() {
        let tmp = tempfile::tempdir().unwrap();
        let mut settings = OverlaySettings::default();
        settings.resolve_paths(tmp.path());
        assert!(check(&settings, None).is_err());

        std::fs::create_dir_all(settings.font_file.parent().unwrap()).unwrap();
        std::fs::write(&settings.font_file, b"ttf").unwrap();
        for rule in &settings.rules {
            std::fs::create_dir_all(rule.icon.parent().unwrap()).unwrap();
            std::fs::write(&rule.icon, b"png").unwrap();
        }
        assert!(check(&settings, None).is_ok());
    }
}
