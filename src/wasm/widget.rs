//! The exported `PixelReveal` widget.
//!
//! All browser state hangs off one `Rc<Inner>`. Every callback the browser can
//! invoke (image load, intersection, resize, frame timer) holds a `Weak` to it,
//! and every subscription is an RAII handle stored in `Inner`, so dropping the
//! widget detaches it from the page.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, HtmlImageElement};

use crate::animator::{AnimationState, Animator};
use crate::config::PixelRevealConfig;
use crate::error::{Result, RevealError};
use crate::schedule::Frame;

use super::dom_err;
use super::loader::ImageLoader;
use super::observer::VisibilityObserver;
use super::render::{cover_container, Surface};

/// Options passed to [`PixelReveal::new`].
#[wasm_bindgen]
#[derive(Clone)]
pub struct PixelRevealOptions {
    config: PixelRevealConfig,
}

#[wasm_bindgen]
impl PixelRevealOptions {
    #[wasm_bindgen(constructor)]
    pub fn new(src: String, placeholder: String) -> PixelRevealOptions {
        Self {
            config: PixelRevealConfig::new(src, placeholder),
        }
    }

    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> std::result::Result<PixelRevealOptions, JsValue> {
        Ok(Self {
            config: PixelRevealConfig::from_json(json)?,
        })
    }

    #[wasm_bindgen(getter, js_name = initialPixelation)]
    pub fn initial_pixelation(&self) -> u32 {
        self.config.initial_pixelation
    }

    #[wasm_bindgen(setter, js_name = initialPixelation)]
    pub fn set_initial_pixelation(&mut self, value: u32) {
        self.config.initial_pixelation = value;
    }

    #[wasm_bindgen(getter)]
    pub fn threshold(&self) -> u32 {
        self.config.threshold
    }

    #[wasm_bindgen(setter)]
    pub fn set_threshold(&mut self, value: u32) {
        self.config.threshold = value;
    }

    /// Milliseconds between frames.
    #[wasm_bindgen(getter)]
    pub fn timeout(&self) -> u32 {
        self.config.timeout
    }

    #[wasm_bindgen(setter)]
    pub fn set_timeout(&mut self, value: u32) {
        self.config.timeout = value;
    }

    #[wasm_bindgen(getter, js_name = minResolution)]
    pub fn min_resolution(&self) -> f64 {
        self.config.min_resolution
    }

    #[wasm_bindgen(setter, js_name = minResolution)]
    pub fn set_min_resolution(&mut self, value: f64) {
        self.config.min_resolution = value;
    }

    #[wasm_bindgen(getter)]
    pub fn alt(&self) -> String {
        self.config.image.alt.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_alt(&mut self, value: String) {
        self.config.image.alt = value;
    }

    #[wasm_bindgen(getter, js_name = visibilityThreshold)]
    pub fn visibility_threshold(&self) -> f64 {
        self.config.visibility_threshold
    }

    #[wasm_bindgen(setter, js_name = visibilityThreshold)]
    pub fn set_visibility_threshold(&mut self, value: f64) {
        self.config.visibility_threshold = value;
    }
}

struct Inner {
    config: PixelRevealConfig,
    container: HtmlElement,
    placeholder: HtmlImageElement,
    surface: Surface,
    animator: RefCell<Animator>,
    loader: RefCell<Option<ImageLoader>>,
    observer: RefCell<Option<VisibilityObserver>>,
    resize: RefCell<Option<EventListener>>,
    timer: RefCell<Option<Timeout>>,
    on_error: RefCell<Option<js_sys::Function>>,
}

/// Image that de-pixelates itself once it is scrolled into view.
#[wasm_bindgen]
pub struct PixelReveal {
    inner: Option<Rc<Inner>>,
}

#[wasm_bindgen]
impl PixelReveal {
    /// Mount the widget into `container` and start loading the image.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        options: &PixelRevealOptions,
    ) -> std::result::Result<PixelReveal, JsValue> {
        let inner = Inner::mount(container, options.config.clone())?;
        Ok(Self { inner: Some(inner) })
    }

    /// Current animation state: `idle`, `loading`, `animating`, `complete`,
    /// `failed`, or `destroyed` after [`PixelReveal::destroy`].
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        match &self.inner {
            Some(inner) => inner.animator.borrow().state().as_str().to_owned(),
            None => "destroyed".to_owned(),
        }
    }

    /// Block size of the mosaic currently on the canvas, if any.
    #[wasm_bindgen(getter, js_name = blockSize)]
    pub fn block_size(&self) -> Option<u32> {
        let inner = self.inner.as_ref()?;
        match inner.animator.borrow().last_frame()? {
            Frame::Mosaic { block } => Some(block),
            Frame::Clear => None,
        }
    }

    /// Last error message, if the widget has failed.
    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        let inner = self.inner.as_ref()?;
        let animator = inner.animator.borrow();
        animator.error().map(|err| err.to_string())
    }

    /// Register a callback that receives an `Error` when loading or drawing fails.
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&self, callback: js_sys::Function) {
        if let Some(inner) = &self.inner {
            *inner.on_error.borrow_mut() = Some(callback);
        }
    }

    /// Cancel any pending frame, release listeners and remove the widget's elements.
    pub fn destroy(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.teardown();
        }
    }
}

impl Drop for PixelReveal {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl Inner {
    fn mount(container: HtmlElement, config: PixelRevealConfig) -> Result<Rc<Self>> {
        config.validate()?;
        let document = container
            .owner_document()
            .ok_or_else(|| RevealError::Dom("container is not attached to a document".into()))?;

        let style = container.style();
        if style.get_property_value("position").unwrap_or_default().is_empty() {
            style.set_property("position", "relative").map_err(dom_err)?;
        }
        style.set_property("overflow", "hidden").map_err(dom_err)?;

        let placeholder = HtmlImageElement::new().map_err(dom_err)?;
        placeholder.set_src(&config.image.placeholder);
        placeholder.set_alt(&config.image.alt);
        cover_container(&placeholder)?;

        let surface = Surface::create(&document)?;
        container.append_child(&placeholder).map_err(dom_err)?;
        container.append_child(surface.canvas()).map_err(dom_err)?;

        let mut animator = Animator::new(&config);
        animator.set_container(
            container.client_width() as f64,
            container.client_height() as f64,
        );

        let inner = Rc::new(Self {
            config,
            container,
            placeholder,
            surface,
            animator: RefCell::new(animator),
            loader: RefCell::new(None),
            observer: RefCell::new(None),
            resize: RefCell::new(None),
            timer: RefCell::new(None),
            on_error: RefCell::new(None),
        });
        if let Err(err) = inner.subscribe() {
            inner.teardown();
            return Err(err);
        }
        info!("mounted reveal for {}", inner.config.image.src);
        Ok(inner)
    }

    fn subscribe(self: &Rc<Self>) -> Result<()> {
        let window = web_sys::window().ok_or_else(|| RevealError::Dom("no window".into()))?;
        let weak = Rc::downgrade(self);
        let resize = EventListener::new(&window, "resize", move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.on_resize();
            }
        });
        *self.resize.borrow_mut() = Some(resize);

        let weak = Rc::downgrade(self);
        let observer = VisibilityObserver::observe(
            self.surface.canvas(),
            self.config.visibility_threshold,
            move |ratio| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_visibility(ratio);
                }
            },
        )?;
        *self.observer.borrow_mut() = Some(observer);

        self.animator.borrow_mut().begin_loading();
        let loaded: Weak<Self> = Rc::downgrade(self);
        let failed: Weak<Self> = Rc::downgrade(self);
        let loader = ImageLoader::start(
            &self.config.image.src,
            move |_| {
                if let Some(inner) = loaded.upgrade() {
                    inner.on_loaded();
                }
            },
            move |err| {
                if let Some(inner) = failed.upgrade() {
                    inner.fail(err);
                }
            },
        )?;
        *self.loader.borrow_mut() = Some(loader);
        Ok(())
    }

    fn on_loaded(self: &Rc<Self>) {
        let natural = match self.loader.borrow().as_ref() {
            Some(loader) => loader.natural_size(),
            None => return,
        };
        let (width, height) = self.container_size();
        let started = {
            let mut animator = self.animator.borrow_mut();
            animator.set_container(width, height);
            animator.asset_loaded(natural.0, natural.1)
        };
        match started {
            Ok(started) => {
                if let Some(size) = self.animator.borrow().canvas_size() {
                    self.surface.set_size(size);
                }
                if started {
                    self.step();
                }
            }
            Err(err) => self.report(err),
        }
    }

    fn on_visibility(self: &Rc<Self>, ratio: f64) {
        let started = self.animator.borrow_mut().observe_visibility(ratio);
        if self.animator.borrow().is_visible() {
            if let Some(observer) = self.observer.borrow().as_ref() {
                observer.stop();
            }
        }
        if started {
            self.step();
        }
    }

    fn on_resize(&self) {
        if self.animator.borrow().state() == AnimationState::Failed {
            return;
        }
        let (width, height) = self.container_size();
        let resized = self.animator.borrow_mut().resize(width, height);
        match resized {
            Ok(Some(size)) => {
                self.surface.set_size(size);
                // setting the size wiped the canvas; put the current frame back
                let last = self.animator.borrow().last_frame();
                if let Some(frame) = last {
                    if let Err(err) = self.draw(frame) {
                        self.fail(err);
                    }
                }
            }
            Ok(None) => {}
            Err(err) => self.fail(err),
        }
    }

    /// Draw the next frame and schedule the one after it.
    fn step(self: &Rc<Self>) {
        let frame = self.animator.borrow_mut().next_frame();
        let Some(frame) = frame else {
            return;
        };
        if let Err(err) = self.draw(frame) {
            self.fail(err);
            return;
        }
        if frame == Frame::Clear {
            self.timer.borrow_mut().take();
            return;
        }

        let weak = Rc::downgrade(self);
        let timer = Timeout::new(self.config.timeout, move || {
            if let Some(inner) = weak.upgrade() {
                inner.step();
            }
        });
        *self.timer.borrow_mut() = Some(timer);
    }

    fn draw(&self, frame: Frame) -> Result<()> {
        let loader = self.loader.borrow();
        let Some(loader) = loader.as_ref() else {
            return Ok(());
        };
        self.surface.draw(loader.image(), frame)
    }

    fn fail(&self, err: RevealError) {
        self.timer.borrow_mut().take();
        self.animator.borrow_mut().fail(err.clone());
        self.report(err);
    }

    fn report(&self, err: RevealError) {
        error!("{err}");
        let callback = self.on_error.borrow().clone();
        if let Some(callback) = callback {
            let value: JsValue = err.into();
            if let Err(thrown) = callback.call1(&JsValue::NULL, &value) {
                error!("onError callback threw: {}", super::js_message(&thrown));
            }
        }
    }

    fn container_size(&self) -> (f64, f64) {
        (
            self.container.client_width() as f64,
            self.container.client_height() as f64,
        )
    }

    fn teardown(&self) {
        self.timer.borrow_mut().take();
        self.observer.borrow_mut().take();
        self.resize.borrow_mut().take();
        self.loader.borrow_mut().take();
        self.on_error.borrow_mut().take();
        self.surface.remove();
        self.placeholder.remove();
        info!("unmounted reveal for {}", self.config.image.src);
    }
}
