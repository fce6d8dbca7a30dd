//! End-to-end pipeline runs: adjust, resize, flatten, quantize, census.

mod common;

use common::{all_opaque_in_palette, black_and_white, gradient, noise, opaque_noise, primaries, SKY};
use place_dither::{DistanceMetric, Palette, Phase, PixelBuffer, Rgb};
use pixelplace::models::{AppConfig, ProcessingSettings};
use pixelplace::services::{ImagePipeline, Outcome, TaskRunner};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

fn pipeline() -> ImagePipeline {
    ImagePipeline::new(Arc::new(TaskRunner::new()))
}

#[tokio::test]
async fn test_output_uses_only_palette_colors() {
    let settings = ProcessingSettings::new(primaries(), 24, 16);
    let output = pipeline()
        .process(opaque_noise(48, 32, 1), &settings, |_, _| {})
        .await
        .unwrap()
        .completed()
        .unwrap();

    assert_eq!(output.quantized.width(), 24);
    assert_eq!(output.quantized.height(), 16);
    assert_eq!(output.adjusted.width(), 48);
    assert!(all_opaque_in_palette(&output.quantized, &primaries()));
    assert_eq!(output.census.total(), 24 * 16);
}

#[tokio::test]
async fn test_every_metric_produces_palette_output() {
    for metric in DistanceMetric::ALL {
        let mut settings = ProcessingSettings::new(primaries(), 12, 12);
        settings.metric = metric;
        settings.dither = 60.0;
        let output = pipeline()
            .process(opaque_noise(12, 12, 5), &settings, |_, _| {})
            .await
            .unwrap()
            .completed()
            .unwrap();
        assert!(all_opaque_in_palette(&output.quantized, &primaries()), "{metric}");
    }
}

#[tokio::test]
async fn test_alpha_is_binary_and_census_matches_opaque_pixels() {
    let settings = ProcessingSettings::new(black_and_white(), 20, 20);
    let output = pipeline()
        .process(noise(20, 20, 9), &settings, |_, _| {})
        .await
        .unwrap()
        .completed()
        .unwrap();

    let opaque = output.quantized.pixels().filter(|px| px[3] == 255).count();
    assert!(output
        .quantized
        .pixels()
        .all(|px| px[3] == 0 || px[3] == 255));
    assert_eq!(output.census.total(), opaque);
    let sum: usize = output.census.per_palette().iter().map(|(_, n)| n).sum();
    assert_eq!(sum, opaque);
}

#[tokio::test]
async fn test_terrain_pixels_become_transparent() {
    let mut settings = ProcessingSettings::new(black_and_white(), 8, 8);
    settings.dither = 0.0;
    settings.terrain = Some(SKY);

    let mut source = PixelBuffer::filled(8, 8, [10, 10, 10, 255]);
    for x in 0..8 {
        source.set_pixel(x, 0, [150, 190, 250, 255]);
    }
    let output = pipeline()
        .process(source, &settings, |_, _| {})
        .await
        .unwrap()
        .completed()
        .unwrap();

    assert_eq!(output.terrain_pixels, 8);
    assert_eq!(output.palette.colors(), &[Rgb::BLACK, Rgb::WHITE, SKY]);
    assert_eq!(output.census.total(), 56);
    assert_eq!(output.census.count_of(Rgb::BLACK), 56);
    assert_eq!(output.census.count_of(SKY), 0);
    for x in 0..8 {
        assert_eq!(output.quantized.pixel(x, 0), [0, 0, 0, 0]);
    }
}

#[tokio::test]
async fn test_progress_covers_both_stages() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let settings = ProcessingSettings::new(black_and_white(), 32, 8);
    pipeline()
        .process(gradient(32, 8), &settings, move |phase, pct| {
            sink.lock().unwrap().push((phase, pct))
        })
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    let adjust: Vec<u8> = seen
        .iter()
        .filter(|(ph, _)| *ph == Phase::Adjust)
        .map(|&(_, p)| p)
        .collect();
    assert_eq!(adjust.first(), Some(&0));
    assert_eq!(adjust.last(), Some(&100));
    assert_eq!(seen.last(), Some(&(Phase::Dither, 100)));
    let first_dither = seen.iter().position(|(ph, _)| *ph == Phase::Dither).unwrap();
    assert!(seen[..first_dither].iter().all(|(ph, _)| *ph == Phase::Adjust));
}

#[tokio::test]
async fn test_pixel_mode_preserves_blocks() {
    let mut settings = ProcessingSettings::new(black_and_white(), 4, 4);
    settings.pixel_mode = true;
    settings.dither = 0.0;
    let source = PixelBuffer::from_raw(
        2,
        2,
        vec![
            0, 0, 0, 255, 255, 255, 255, 255, //
            255, 255, 255, 255, 0, 0, 0, 255,
        ],
    )
    .unwrap();
    let output = pipeline()
        .process(source.clone(), &settings, |_, _| {})
        .await
        .unwrap()
        .completed()
        .unwrap();
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(output.quantized.pixel(x, y), source.pixel(x / 2, y / 2));
        }
    }
}

#[tokio::test]
async fn test_newer_run_supersedes_older() {
    let runner = Arc::new(TaskRunner::new());
    let older = ImagePipeline::new(runner.clone());
    let newer = ImagePipeline::new(runner);

    // Large and slow enough that the older run is still going when the
    // newer one starts.
    let mut settings = ProcessingSettings::new(primaries(), 600, 600);
    settings.metric = DistanceMetric::Ciede2000;
    let (started_tx, started_rx) = tokio::sync::oneshot::channel();
    let started_tx = Mutex::new(Some(started_tx));
    let older_events = Arc::new(Mutex::new(0usize));
    let counter = older_events.clone();
    let older_settings = settings.clone();
    let older_run = tokio::spawn(async move {
        older
            .process(opaque_noise(600, 600, 3), &older_settings, move |phase, _| {
                if phase == Phase::Dither {
                    if let Some(tx) = started_tx.lock().unwrap().take() {
                        let _ = tx.send(());
                    }
                }
                *counter.lock().unwrap() += 1;
            })
            .await
    });
    started_rx.await.unwrap();

    let mut small = settings.clone();
    small.width = 4;
    small.height = 4;
    let result = newer
        .process(PixelBuffer::filled(4, 4, [0, 0, 0, 255]), &small, |_, _| {})
        .await
        .unwrap();

    assert!(matches!(result, Outcome::Completed(_)));
    let at_supersession = *older_events.lock().unwrap();
    assert!(older_run.await.unwrap().unwrap().is_superseded());
    assert_eq!(*older_events.lock().unwrap(), at_supersession);
}

#[tokio::test]
async fn test_settings_from_default_config() {
    let settings = ProcessingSettings::from_config(&AppConfig::default(), 10, 10).unwrap();
    let output = pipeline()
        .process(gradient(10, 10), &settings, |_, _| {})
        .await
        .unwrap()
        .completed()
        .unwrap();
    let wplace: Palette = settings.palette.clone();
    assert!(all_opaque_in_palette(&output.quantized, &wplace));
}
