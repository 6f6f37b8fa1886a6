//! Editing session: the one image being worked on, its painted mask, the last
//! composite, and the single in-flight inference request.
//!
//! Everything runs on one logical thread. Inference is split into
//! [`EditorSession::begin_process`] and [`EditorSession::complete_process`] so the caller
//! can await the model however it likes in between. Each loaded image gets a new
//! [`Generation`]; a result whose ticket carries an older generation is dropped.
//!
//! The busy flag belongs to the image it was raised for. Loading another image or
//! resetting releases it, and a caller that gives up on a ticket hands it back with
//! [`EditorSession::abandon_process`].

use crate::buffer::PixelBuffer;
use crate::composite::composite;
use crate::config::EditorConfig;
use crate::error::{Error, Result};
use crate::export::{encode, EncodedImage};
use crate::inference::{InferenceOutput, MattingModel};
use crate::mapping::{to_buffer, to_buffer_pixel, BufferPoint, DisplayRect};
use crate::mask::MaskSource;
use crate::paint::{BrushPaintEngine, BrushState, PaintedMask};

/// Version stamp of the loaded image, bumped on every load and reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

/// Proof that an inference request was admitted, plus the image to run it on.
#[derive(Debug)]
pub struct ProcessTicket {
    generation: Generation,
    image: PixelBuffer,
}

impl ProcessTicket {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The result was composited and is now the processed image.
    Applied,
    /// The image changed while the request was in flight; the result was dropped.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InferenceState {
    Idle,
    InFlight(Generation),
}

#[derive(Debug)]
struct ActiveImage {
    buffer: PixelBuffer,
    generation: Generation,
}

#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    generation: Generation,
    image: Option<ActiveImage>,
    processed: Option<PixelBuffer>,
    brush: BrushPaintEngine,
    inference: InferenceState,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Result<Self> {
        config.validate()?;
        let brush = BrushPaintEngine::new(config.brush_radius)?;
        Ok(Self {
            config,
            generation: Generation(0),
            image: None,
            processed: None,
            brush,
            inference: InferenceState::Idle,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn image(&self) -> Option<&PixelBuffer> {
        self.image.as_ref().map(|active| &active.buffer)
    }

    pub fn processed(&self) -> Option<&PixelBuffer> {
        self.processed.as_ref()
    }

    pub fn painted_mask(&self) -> Option<&PaintedMask> {
        self.brush.mask()
    }

    pub fn brush_state(&self) -> BrushState {
        self.brush.state()
    }

    /// True while a request for the current image is outstanding.
    pub fn is_busy(&self) -> bool {
        match self.inference {
            InferenceState::Idle => false,
            InferenceState::InFlight(generation) => {
                self.image.as_ref().map(|active| active.generation) == Some(generation)
            }
        }
    }

    /// Drop the busy flag if it was raised for `generation`.
    fn release_inference(&mut self, generation: Generation) {
        if self.inference == InferenceState::InFlight(generation) {
            self.inference = InferenceState::Idle;
        }
    }

    /// Decode and activate a new image. On decode failure the current image stays.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<Generation> {
        let buffer = PixelBuffer::from_decoded_image(bytes)?;
        self.load_buffer(buffer)
    }

    pub fn load_buffer(&mut self, buffer: PixelBuffer) -> Result<Generation> {
        let (width, height) = buffer.dimensions();
        self.brush.allocate(width, height)?;

        self.generation = Generation(self.generation.0 + 1);
        self.image = Some(ActiveImage {
            buffer,
            generation: self.generation,
        });
        self.processed = None;

        tracing::info!(
            generation = self.generation.0,
            "Loaded {}x{} image",
            width,
            height
        );
        Ok(self.generation)
    }

    /// Forget the image, the painted mask and the processed result.
    pub fn reset(&mut self) {
        self.generation = Generation(self.generation.0 + 1);
        self.image = None;
        self.processed = None;
        self.inference = InferenceState::Idle;
        self.brush.release();
        tracing::debug!(generation = self.generation.0, "Session reset");
    }

    /// Admit one inference request. A second request before completion is rejected.
    pub fn begin_process(&mut self) -> Result<ProcessTicket> {
        if self.is_busy() {
            return Err(Error::Busy);
        }
        let active = self.image.as_ref().ok_or(Error::NoImage)?;

        self.inference = InferenceState::InFlight(active.generation);
        Ok(ProcessTicket {
            generation: active.generation,
            image: active.buffer.clone(),
        })
    }

    /// Finish a request admitted by [`EditorSession::begin_process`].
    ///
    /// Clears the busy flag raised for this ticket. Stale results, successful or not,
    /// are discarded. On error the previous processed image is left as it was.
    pub fn complete_process(
        &mut self,
        ticket: ProcessTicket,
        result: Result<InferenceOutput>,
    ) -> Result<ProcessOutcome> {
        self.release_inference(ticket.generation);

        let current = self.image.as_ref().map(|active| active.generation);
        if current != Some(ticket.generation) {
            tracing::debug!(
                ticket = ticket.generation.0,
                current = self.generation.0,
                "Discarding stale inference result"
            );
            return Ok(ProcessOutcome::Stale);
        }

        let output = result?;
        let output = composite(&ticket.image, &MaskSource::from(output), self.config.resample)?;
        self.processed = Some(output);
        Ok(ProcessOutcome::Applied)
    }

    /// Give up on a request without a result, e.g. when the caller cancelled it.
    pub fn abandon_process(&mut self, ticket: ProcessTicket) {
        tracing::debug!(ticket = ticket.generation.0, "Inference request abandoned");
        self.release_inference(ticket.generation);
    }

    /// Run a model synchronously between begin and complete.
    pub fn process_with(&mut self, model: &mut dyn MattingModel) -> Result<ProcessOutcome> {
        let ticket = self.begin_process()?;
        let result = model.infer(ticket.image());
        self.complete_process(ticket, result)
    }

    /// Composite the current image against any mask and keep the result.
    pub fn apply_mask(&mut self, mask: &MaskSource) -> Result<&PixelBuffer> {
        let active = self.image.as_ref().ok_or(Error::NoImage)?;
        let output = composite(&active.buffer, mask, self.config.resample)?;
        let processed: &PixelBuffer = self.processed.insert(output);
        Ok(processed)
    }

    /// Reveal only what has been painted so far.
    pub fn apply_painted_mask(&mut self) -> Result<&PixelBuffer> {
        let mask = self.brush.mask().cloned().ok_or(Error::NoImage)?;
        self.apply_mask(&MaskSource::Painted(mask))
    }

    fn canvas_size(&self) -> Option<(u32, u32)> {
        self.brush.mask().map(PaintedMask::dimensions)
    }

    /// Pointer pressed on the paint surface. Presses outside the surface are ignored.
    pub fn pointer_down(&mut self, client_x: f32, client_y: f32, rect: &DisplayRect) {
        let Some(size) = self.canvas_size() else {
            return;
        };
        if to_buffer_pixel(client_x, client_y, rect, size).is_some() {
            self.brush.begin_stroke(to_buffer(client_x, client_y, rect, size));
        }
    }

    pub fn pointer_move(&mut self, client_x: f32, client_y: f32, rect: &DisplayRect) {
        let Some(size) = self.canvas_size() else {
            return;
        };
        self.brush.move_stroke(to_buffer(client_x, client_y, rect, size));
    }

    pub fn pointer_up(&mut self) {
        self.brush.end_stroke();
    }

    pub fn pointer_leave(&mut self) {
        self.brush.pointer_leave();
    }

    /// Paint directly in buffer space, bypassing display mapping.
    pub fn paint_stroke(&mut self, points: &[BufferPoint]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.brush.begin_stroke(*first);
        for point in rest {
            self.brush.move_stroke(*point);
        }
        self.brush.end_stroke();
    }

    pub fn set_brush_radius(&mut self, radius: u32) -> Result<()> {
        self.brush.set_radius(radius)?;
        self.config.brush_radius = radius;
        Ok(())
    }

    pub fn clear_mask(&mut self) {
        self.brush.clear();
    }

    /// PNG-encode the processed image.
    pub fn export(&self) -> Result<EncodedImage> {
        let processed = self.processed.as_ref().ok_or(Error::NothingToExport)?;
        encode(processed)
    }
}
