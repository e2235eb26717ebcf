//! Interactive cropping session.
//!
//! [`ImageCropper`] ties the pieces together: it owns the settings, the
//! loaded (orientation-corrected, optionally padded) image, the crop engine
//! and the last known-good [`CropResult`].
//!
//! # Loading
//!
//! Decoding may finish out of order when the host runs it elsewhere. Every
//! load starts with [`ImageCropper::begin_load`], which hands out a ticket;
//! only the most recently issued ticket may complete, and only once. Earlier
//! results and repeat deliveries are dropped when they arrive.
//!
//! # Examples
//!
//! ```ignore
//! let mut cropper = ImageCropper::new(CropperSettings::default())?;
//! let ticket = cropper.begin_load();
//! cropper.load_bytes(ticket, &bytes)?;
//! cropper.set_display_size(ImageDimensions::new(400, 300))?;
//!
//! cropper.pointer_down(DragKind::Resize(Handle::BottomRight), Point::new(350.0, 300.0));
//! cropper.pointer_move(Point::new(380.0, 280.0));
//! let result = cropper.pointer_up()?;
//! ```

use tracing::{debug, warn};

use super::engine::CropEngine;
use super::geometry::{CropConstraints, CropRect, DragKind, Point, DEFAULT_MIN_SIDE};
use super::producer::{produce, CropResult};
use super::settings::CropperSettings;
use crate::decode::{decode_image, ImageDimensions, PixelBuffer};
use crate::encode::{OutputEncoder, StandardEncoder};
use crate::error::CropError;
use crate::transform::{contain_within_aspect_ratio, extend_to_square, PaddedImage};

const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// What happened to a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The image replaced the current one.
    Applied,
    /// A newer load was started; this result was dropped.
    Discarded,
}

#[derive(Debug)]
struct LoadedImage {
    /// Pixels the cropper works on, padding included.
    buffer: PixelBuffer,
    /// Size before padding.
    original: ImageDimensions,
    /// Where the original sits inside `buffer`, if padded.
    padding: Option<(u32, u32)>,
}

/// An interactive crop over one loaded image at a time.
pub struct ImageCropper {
    settings: CropperSettings,
    encoder: Option<Box<dyn OutputEncoder>>,
    latest_ticket: u64,
    /// The ticket still waiting for its result.
    pending: Option<u64>,
    image: Option<LoadedImage>,
    engine: Option<CropEngine>,
    display: Option<ImageDimensions>,
    last_result: Option<CropResult>,
}

impl std::fmt::Debug for ImageCropper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCropper")
            .field("settings", &self.settings)
            .field("has_encoder", &self.encoder.is_some())
            .field("latest_ticket", &self.latest_ticket)
            .field("pending", &self.pending)
            .field("image", &self.image.as_ref().map(|i| i.buffer.dimensions()))
            .field("engine", &self.engine)
            .field("display", &self.display)
            .finish()
    }
}

impl ImageCropper {
    /// Create a session encoding through [`StandardEncoder`].
    ///
    /// JPEG output is flattened onto the configured background colour, or
    /// white when none is set.
    pub fn new(settings: CropperSettings) -> Result<Self, CropError> {
        let encoder = StandardEncoder::with_background(settings.background_color.unwrap_or(WHITE));
        Self::with_encoder(settings, Some(Box::new(encoder)))
    }

    /// Create a session with a custom encoder, or none at all (every crop
    /// then fails with `CropError::RenderingUnavailable`).
    pub fn with_encoder(
        settings: CropperSettings,
        encoder: Option<Box<dyn OutputEncoder>>,
    ) -> Result<Self, CropError> {
        settings.validate()?;
        Ok(Self {
            settings,
            encoder,
            latest_ticket: 0,
            pending: None,
            image: None,
            engine: None,
            display: None,
            last_result: None,
        })
    }

    pub fn settings(&self) -> &CropperSettings {
        &self.settings
    }

    /// Replace the settings.
    ///
    /// Constraint changes reset the rectangle. Padding changes take effect on
    /// the next load.
    pub fn set_settings(&mut self, settings: CropperSettings) -> Result<Option<CropRect>, CropError> {
        settings.validate()?;
        self.settings = settings;
        Ok(self.apply_constraints())
    }

    /// Lock or unlock the aspect ratio. The rectangle is reset.
    pub fn set_aspect_ratio(&mut self, locked: bool, ratio: f64) -> Result<Option<CropRect>, CropError> {
        let settings = CropperSettings {
            aspect_ratio_locked: locked,
            locked_ratio: ratio,
            ..self.settings.clone()
        };
        self.set_settings(settings)
    }

    /// Start a load and return its ticket. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        self.pending = Some(self.latest_ticket);
        LoadTicket(self.latest_ticket)
    }

    /// Deliver the outcome of a load.
    ///
    /// # Returns
    ///
    /// `LoadStatus::Discarded` if a newer load has begun or this ticket has
    /// already completed, otherwise `LoadStatus::Applied`. An applied image clears the rectangle and the
    /// last result until [`Self::set_display_size`] is called.
    ///
    /// # Errors
    ///
    /// A failed decode for the latest ticket is returned as is; the previous
    /// image, rectangle and result are kept. Padding can fail with
    /// `CropError::RenderingUnavailable`.
    pub fn complete_load<E>(
        &mut self,
        ticket: LoadTicket,
        result: Result<PixelBuffer, E>,
    ) -> Result<LoadStatus, CropError>
    where
        E: Into<CropError>,
    {
        if self.is_stale(ticket) {
            return Ok(LoadStatus::Discarded);
        }
        self.pending = None;

        let buffer = result.map_err(Into::<CropError>::into).inspect_err(|e| {
            warn!(error = %e, "load failed, keeping current image");
        })?;
        let loaded = self.prepare(buffer)?;

        debug!(
            width = loaded.buffer.width,
            height = loaded.buffer.height,
            padded = loaded.padding.is_some(),
            "image loaded"
        );

        self.image = Some(loaded);
        self.engine = None;
        self.display = None;
        self.last_result = None;
        Ok(LoadStatus::Applied)
    }

    /// Decode `bytes` (with orientation correction) and complete the load.
    pub fn load_bytes(&mut self, ticket: LoadTicket, bytes: &[u8]) -> Result<LoadStatus, CropError> {
        if self.is_stale(ticket) {
            return Ok(LoadStatus::Discarded);
        }
        let decoded = decode_image(bytes);
        self.complete_load(ticket, decoded)
    }

    /// The working image, padding included.
    pub fn image(&self) -> Option<&PixelBuffer> {
        self.image.as_ref().map(|i| &i.buffer)
    }

    /// Size of the loaded image before padding.
    pub fn original_dimensions(&self) -> Option<ImageDimensions> {
        self.image.as_ref().map(|i| i.original)
    }

    /// Tell the session how large the working image is displayed.
    ///
    /// The first call after a load creates the rectangle; later calls scale
    /// it to the new size.
    ///
    /// # Errors
    ///
    /// - `CropError::DegenerateRegion` for a zero display side
    /// - `CropError::NoImageLoaded` before any image is loaded
    pub fn set_display_size(&mut self, display: ImageDimensions) -> Result<CropRect, CropError> {
        if display.is_empty() {
            return Err(CropError::degenerate(display.width, display.height));
        }
        let source = self
            .image
            .as_ref()
            .ok_or(CropError::NoImageLoaded)?
            .buffer
            .dimensions();
        let constraints = self.constraints_for(display, source);

        let rect = match (self.display, &mut self.engine) {
            (Some(previous), Some(engine)) => {
                engine.rescale(previous, display);
                engine.set_minimums(constraints.min_width, constraints.min_height, display)
            }
            (_, slot) => slot.insert(CropEngine::new(display, constraints)).rect(),
        };

        self.display = Some(display);
        Ok(rect)
    }

    /// The current rectangle in display coordinates.
    pub fn rect(&self) -> Option<CropRect> {
        self.engine.as_ref().map(CropEngine::rect)
    }

    pub fn is_dragging(&self) -> bool {
        self.engine.as_ref().is_some_and(CropEngine::is_dragging)
    }

    /// Reset the rectangle to its default position.
    pub fn reset(&mut self) -> Option<CropRect> {
        let display = self.display?;
        self.engine.as_mut().map(|e| e.reset(display))
    }

    /// Position the rectangle programmatically.
    pub fn set_rect(&mut self, rect: CropRect) -> Option<CropRect> {
        let display = self.display?;
        self.engine.as_mut().map(|e| e.set_rect(rect, display))
    }

    pub fn pointer_down(&mut self, kind: DragKind, at: Point) -> bool {
        self.engine
            .as_mut()
            .is_some_and(|e| e.pointer_down(kind, at))
    }

    pub fn pointer_move(&mut self, at: Point) -> Option<CropRect> {
        let display = self.display?;
        self.engine.as_mut()?.pointer_move(at, display)
    }

    pub fn pinch_move(&mut self, distance: f64) -> Option<CropRect> {
        let display = self.display?;
        self.engine.as_mut()?.pinch_move(distance, display)
    }

    /// End the drag. With `auto_crop` on, a crop is produced.
    ///
    /// # Returns
    ///
    /// The new result when a drag ended and a crop was produced, `None`
    /// otherwise.
    pub fn pointer_up(&mut self) -> Result<Option<&CropResult>, CropError> {
        let ended = self.engine.as_mut().and_then(CropEngine::pointer_up);
        if ended.is_some() && self.settings.auto_crop {
            return self.crop().map(Some);
        }
        Ok(None)
    }

    /// Produce a crop of the current rectangle.
    ///
    /// On success the result replaces the last one; on failure the last
    /// result is kept.
    pub fn crop(&mut self) -> Result<&CropResult, CropError> {
        let image = self.image.as_ref().ok_or(CropError::NoImageLoaded)?;
        let (Some(engine), Some(display)) = (self.engine.as_ref(), self.display) else {
            return Err(CropError::degenerate(0, 0));
        };

        let options = self.settings.output_options();
        let produced = produce(
            &image.buffer,
            display,
            engine.rect(),
            &options,
            self.encoder.as_deref(),
        );

        match produced {
            Ok(result) => {
                let result = match image.padding {
                    Some((ox, oy)) => result.with_padding_offset(ox, oy),
                    None => result,
                };
                Ok(self.last_result.insert(result))
            }
            Err(e) => {
                warn!(error = %e, "crop failed, keeping last result");
                Err(e)
            }
        }
    }

    /// The last successful crop.
    pub fn last_result(&self) -> Option<&CropResult> {
        self.last_result.as_ref()
    }

    fn is_stale(&self, ticket: LoadTicket) -> bool {
        let stale = self.pending != Some(ticket.0);
        if stale {
            debug!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                pending = ?self.pending,
                "discarding stale load"
            );
        }
        stale
    }

    /// Apply the padding pre-pass configured in the settings.
    fn prepare(&self, buffer: PixelBuffer) -> Result<LoadedImage, CropError> {
        let original = buffer.dimensions();
        let background = self.settings.background();

        let padded: Option<PaddedImage> = if self.settings.extend_to_square {
            Some(extend_to_square(&buffer, background)?)
        } else if self.settings.contain_within_aspect_ratio {
            Some(contain_within_aspect_ratio(
                &buffer,
                self.settings.locked_ratio,
                background,
            )?)
        } else {
            None
        };

        Ok(match padded {
            Some(p) if p.buffer.dimensions() != original => LoadedImage {
                padding: Some((p.offset_x, p.offset_y)),
                buffer: p.buffer,
                original,
            },
            _ => LoadedImage {
                buffer,
                original,
                padding: None,
            },
        })
    }

    /// Engine constraints for the current settings at `display` size.
    ///
    /// The configured minimums are in source pixels; the engine works in
    /// display pixels and never goes below the default minimum.
    fn constraints_for(&self, display: ImageDimensions, source: ImageDimensions) -> CropConstraints {
        let scale = if source.width == 0 {
            1.0
        } else {
            display.width as f64 / source.width as f64
        };
        CropConstraints {
            aspect_ratio: self.settings.aspect_ratio(),
            min_width: DEFAULT_MIN_SIDE.max(self.settings.cropper_min_width * scale),
            min_height: DEFAULT_MIN_SIDE.max(self.settings.cropper_min_height * scale),
        }
    }

    fn apply_constraints(&mut self) -> Option<CropRect> {
        let display = self.display?;
        let source = self.image.as_ref()?.buffer.dimensions();
        let constraints = self.constraints_for(display, source);
        self.engine
            .as_mut()
            .map(|e| e.set_constraints(constraints, display))
    }
}
