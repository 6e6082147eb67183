use image::RgbaImage;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, ImageData};

use crate::error::{Result, RevealError};
use crate::mosaic::pixelate_in_place;
use crate::schedule::Frame;
use crate::sizing::CanvasSize;

use super::{dom_err, js_message};

/// Canvas layered over the placeholder, plus its 2D context.
pub struct Surface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Surface {
    pub fn create(document: &Document) -> Result<Self> {
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(dom_err)?
            .dyn_into()
            .map_err(|_| RevealError::Dom("created element is not a canvas".into()))?;
        cover_container(&canvas)?;

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(surface_err)?
            .ok_or_else(|| RevealError::DrawSurfaceUnavailable("2d context not supported".into()))?
            .dyn_into()
            .map_err(|_| RevealError::DrawSurfaceUnavailable("unexpected context type".into()))?;

        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Resize the backing store. This clears whatever was drawn.
    pub fn set_size(&self, size: CanvasSize) {
        let (w, h) = size.to_pixels();
        self.canvas.set_width(w);
        self.canvas.set_height(h);
    }

    /// Draw `image` scaled to the canvas, then apply the frame's mosaic.
    pub fn draw(&self, image: &HtmlImageElement, frame: Frame) -> Result<()> {
        let (w, h) = (self.canvas.width(), self.canvas.height());
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, w as f64, h as f64)
            .map_err(surface_err)?;

        let Frame::Mosaic { block } = frame else {
            return Ok(());
        };

        // Reading pixels back fails if the image tainted the canvas.
        let data = self
            .ctx
            .get_image_data(0.0, 0.0, w as f64, h as f64)
            .map_err(surface_err)?;
        let mut pixels = RgbaImage::from_raw(w, h, data.data().0).ok_or_else(|| {
            RevealError::DrawSurfaceUnavailable("pixel buffer does not match canvas size".into())
        })?;
        pixelate_in_place(&mut pixels, block);

        let out =
            ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels.as_raw().as_slice()), w, h)
                .map_err(surface_err)?;
        self.ctx.put_image_data(&out, 0.0, 0.0).map_err(surface_err)?;
        Ok(())
    }

    pub fn remove(&self) {
        self.canvas.remove();
    }
}

/// Stretch an element over its container, cropping like `background-size: cover`.
pub fn cover_container(element: &web_sys::HtmlElement) -> Result<()> {
    let style = element.style();
    for (name, value) in [
        ("position", "absolute"),
        ("inset", "0"),
        ("width", "100%"),
        ("height", "100%"),
        ("object-fit", "cover"),
    ] {
        style.set_property(name, value).map_err(dom_err)?;
    }
    Ok(())
}

fn surface_err(err: JsValue) -> RevealError {
    RevealError::DrawSurfaceUnavailable(js_message(&err))
}
