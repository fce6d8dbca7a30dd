use place_dither::{
    flatten_alpha, ColorCensus, Palette, PaletteQuantizer, Phase, PixelBuffer, QuantizeReport,
    ToneAdjustment,
};
use std::sync::Arc;

use super::task_runner::{Outcome, TaskKind, TaskRunner};
use crate::error::PipelineError;
use crate::models::ProcessingSettings;
use crate::rendering::resize;

/// Result of one full pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Source after tone adjustment, at source size (the preview image)
    pub adjusted: PixelBuffer,
    /// Final image at target size, palette colors only
    pub quantized: PixelBuffer,
    /// Opaque pixel counts per matching-palette color
    pub census: ColorCensus,
    /// Palette the pixels were matched against (terrain included)
    pub palette: Palette,
    /// Pixels made transparent by terrain masking
    pub terrain_pixels: usize,
}

/// Adjust, resize, flatten, quantize and count, with the two heavy stages
/// running on the [`TaskRunner`].
///
/// Each stage takes ownership of its input buffer and hands ownership of its
/// output back. A new run supersedes an older one stage by stage: if either
/// stage is replaced the whole run resolves to [`Outcome::Superseded`].
pub struct ImagePipeline {
    runner: Arc<TaskRunner>,
}

impl ImagePipeline {
    pub fn new(runner: Arc<TaskRunner>) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &Arc<TaskRunner> {
        &self.runner
    }

    /// Tone-adjust `source` on the adjust slot.
    pub async fn adjust<S>(
        &self,
        source: PixelBuffer,
        tone: ToneAdjustment,
        progress: S,
    ) -> Result<Outcome<PixelBuffer>, PipelineError>
    where
        S: FnMut(Phase, u8) + Send + 'static,
    {
        let outcome = self
            .runner
            .submit(TaskKind::Adjust, progress, move |p| {
                let mut buf = source;
                tone.apply(&mut buf, p)?;
                Ok(buf)
            })
            .await?;
        Ok(outcome)
    }

    /// Quantize (and terrain-mask) `buf` on the dither slot.
    ///
    /// The quantizer moves into the job, so its matcher memo lives and dies
    /// with that job.
    pub async fn quantize<S>(
        &self,
        buf: PixelBuffer,
        quantizer: PaletteQuantizer,
        progress: S,
    ) -> Result<Outcome<(PixelBuffer, QuantizeReport)>, PipelineError>
    where
        S: FnMut(Phase, u8) + Send + 'static,
    {
        let outcome = self
            .runner
            .submit(TaskKind::Dither, progress, move |p| {
                let mut buf = buf;
                let mut quantizer = quantizer;
                let report = quantizer.run(&mut buf, p)?;
                Ok((buf, report))
            })
            .await?;
        Ok(outcome)
    }

    /// Run every stage for `source`.
    pub async fn process<S>(
        &self,
        source: PixelBuffer,
        settings: &ProcessingSettings,
        progress: S,
    ) -> Result<Outcome<PipelineOutput>, PipelineError>
    where
        S: Fn(Phase, u8) + Send + Sync + 'static,
    {
        settings.validate()?;
        let progress = Arc::new(progress);

        let sink = progress.clone();
        let adjusted = match self
            .adjust(source, settings.tone(), move |phase, pct| sink(phase, pct))
            .await?
        {
            Outcome::Completed(buf) => buf,
            Outcome::Superseded => return Ok(Outcome::Superseded),
        };
        tracing::debug!(
            width = adjusted.width(),
            height = adjusted.height(),
            "Adjusted source"
        );

        let (width, height, pixel_mode) = (settings.width, settings.height, settings.pixel_mode);
        let mut quantizer = PaletteQuantizer::new(settings.palette.clone())
            .intensity(settings.intensity())
            .metric(settings.metric)
            .terrain(settings.terrain);

        let sink = progress.clone();
        let outcome = self
            .runner
            .submit(
                TaskKind::Dither,
                move |phase, pct| sink(phase, pct),
                move |p| {
                    let mut buf = resize(&adjusted, width, height, pixel_mode)?;
                    let flattened = flatten_alpha(&mut buf);
                    tracing::debug!(width, height, pixel_mode, flattened, "Prepared target buffer");

                    let report = quantizer.run(&mut buf, p)?;
                    let palette = quantizer.matching_palette().clone();
                    let census = ColorCensus::count(&buf, &palette);
                    Ok(PipelineOutput {
                        adjusted,
                        quantized: buf,
                        census,
                        palette,
                        terrain_pixels: report.terrain_pixels,
                    })
                },
            )
            .await?;

        match &outcome {
            Outcome::Completed(output) => tracing::info!(
                width,
                height,
                metric = %settings.metric,
                colors = output.palette.len(),
                opaque = output.census.total(),
                terrain = output.terrain_pixels,
                "Pipeline finished"
            ),
            Outcome::Superseded => tracing::debug!("Pipeline run superseded"),
        }
        Ok(outcome)
    }
}
