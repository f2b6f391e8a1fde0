//! Image textures for custom hatch patterns.
//!
//! A [`TextureResource`] starts out pending. Whoever fetches the image (a
//! loader thread, a browser bridge, a test) completes it with
//! [`TextureResource::finish_load`]; callbacks registered while pending fire
//! once, after the state lock is released. `data:` URLs decode immediately.

use crate::error::{PlotError, PlotResult};
use crate::types::TextureRepetition;
use base64::Engine;
use image::RgbaImage;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Weak};

/// Callback asking the owning renderer for another frame
pub type RenderRequest = Arc<dyn Fn() + Send + Sync>;

/// Custom pattern entries of `hatch_extra`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TextureSpec {
    #[serde(rename = "ImageURLTexture")]
    ImageUrl {
        url: String,
        #[serde(default)]
        repetition: TextureRepetition,
    },
}

impl TextureSpec {
    pub fn url(&self) -> &str {
        match self {
            TextureSpec::ImageUrl { url, .. } => url,
        }
    }

    pub fn repetition(&self) -> TextureRepetition {
        match self {
            TextureSpec::ImageUrl { repetition, .. } => *repetition,
        }
    }
}

type LoadCallback = Box<dyn FnOnce() + Send>;

enum TextureState {
    Pending { callbacks: Vec<LoadCallback> },
    Ready(Arc<RgbaImage>),
    Failed(String),
}

/// Shared handle to one texture image and its load state
#[derive(Clone)]
pub struct TextureResource {
    url: String,
    state: Arc<Mutex<TextureState>>,
}

impl TextureResource {
    /// Create the resource; `data:` URLs are decoded right away
    pub fn new(url: impl Into<String>) -> Self {
        let resource = Self {
            url: url.into(),
            state: Arc::new(Mutex::new(TextureState::Pending {
                callbacks: Vec::new(),
            })),
        };
        if let Some(bytes) = decode_data_url(&resource.url) {
            if let Err(e) = bytes.and_then(|b| resource.finish_load(&b)) {
                tracing::warn!(url = %short_url(&resource.url), "failed to decode texture: {e}");
            }
        }
        resource
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.state.lock(), TextureState::Pending { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.lock(), TextureState::Ready(_))
    }

    pub fn image(&self) -> Option<Arc<RgbaImage>> {
        match &*self.state.lock() {
            TextureState::Ready(image) => Some(image.clone()),
            _ => None,
        }
    }

    /// Register a callback for when loading settles. Returns `false` (and
    /// drops the callback) when the resource is no longer pending.
    pub fn on_load(&self, callback: impl FnOnce() + Send + 'static) -> bool {
        match &mut *self.state.lock() {
            TextureState::Pending { callbacks } => {
                callbacks.push(Box::new(callback));
                true
            }
            _ => false,
        }
    }

    /// Decode encoded image bytes and complete the load
    pub fn finish_load(&self, bytes: &[u8]) -> PlotResult<()> {
        match image::load_from_memory(bytes) {
            Ok(image) => {
                self.finish_with_image(image.to_rgba8());
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                self.settle(TextureState::Failed(reason.clone()));
                Err(PlotError::Texture(reason))
            }
        }
    }

    pub fn finish_with_image(&self, image: RgbaImage) {
        self.settle(TextureState::Ready(Arc::new(image)));
    }

    pub fn fail(&self, reason: impl Into<String>) {
        self.settle(TextureState::Failed(reason.into()));
    }

    fn settle(&self, next: TextureState) {
        let previous = std::mem::replace(&mut *self.state.lock(), next);
        if let TextureState::Pending { callbacks } = previous {
            for callback in callbacks {
                callback();
            }
        }
    }
}

impl fmt::Debug for TextureResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.state.lock() {
            TextureState::Pending { callbacks } => format!("pending ({} callbacks)", callbacks.len()),
            TextureState::Ready(image) => format!("ready {}x{}", image.width(), image.height()),
            TextureState::Failed(reason) => format!("failed: {reason}"),
        };
        f.debug_struct("TextureResource")
            .field("url", &short_url(&self.url))
            .field("state", &state)
            .finish()
    }
}

/// Load callback that asks for a render only if the renderer still exists
pub(crate) fn request_render_callback(request: &Weak<dyn Fn() + Send + Sync>) -> impl FnOnce() + Send + 'static {
    let request = request.clone();
    move || {
        if let Some(request) = request.upgrade() {
            request();
        }
    }
}

fn decode_data_url(url: &str) -> Option<PlotResult<Vec<u8>>> {
    let rest = url.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    if !meta.ends_with(";base64") {
        return Some(Err(PlotError::Texture(format!(
            "unsupported data URL encoding: {meta}"
        ))));
    }
    Some(
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| PlotError::Texture(e.to_string())),
    )
}

fn short_url(url: &str) -> &str {
    match url.char_indices().nth(48) {
        Some((end, _)) => &url[..end],
        None => url,
    }
}
