use crate::audio::Narrator;
use crate::client::GeminiClient;
use crate::utils::*;
use bitflags::bitflags;
use magicpals_core::{
    BrushSize, COLORING_THEMES, COLORING_TITLE, Color, Coord, DrawingSurface, GenerationError, ImageHandle,
    PALETTE, Point, Raster, Region, Studio, Ticket, TicketGate,
};
use std::rc::Rc;
use wasm_bindgen::{Clamped, JsValue};
use web_sys::{HtmlCanvasElement, HtmlElement, ImageData};
use yew::prelude::*;

const EXPORT_FILE_NAME: &str = "magic-coloring-page.png";

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq)]
    pub(crate) struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Create(usize),
    Page(Ticket, Result<ImageHandle, GenerationError>),
    Decoded(Ticket, Result<Raster, GenerationError>),
    PointerDown(Point, MouseButtons),
    PointerMove(Point, MouseButtons),
    PointerUp,
    SetColor(Color),
    SetWidth(BrushSize),
    Clear,
    Download,
    Narrated(Result<(), GenerationError>),
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct ColoringProps {
    pub studio: GeminiClient,
}

fn pointer_at(e: &PointerEvent) -> (Point, MouseButtons) {
    let point = Point::new(e.offset_x() as f32, e.offset_y() as f32);
    (point, MouseButtons::from_bits_truncate(e.buttons()))
}

/// Reads the decoded pixels of an image through an offscreen canvas.
async fn decode_page(url: String) -> Result<Raster, GenerationError> {
    let image = load_image(&url).await.map_err(js_error)?;
    let (width, height) = (image.natural_width(), image.natural_height());
    let size = match (Coord::try_from(width), Coord::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(GenerationError::Request(format!(
                "page too large: {}x{}",
                width, height
            )));
        }
    };

    let canvas = create_canvas(width, height).map_err(js_error)?;
    let ctx = context_2d(&canvas).map_err(js_error)?;
    ctx.draw_image_with_html_image_element(&image, 0.0, 0.0)
        .map_err(js_error)?;
    let data = ctx
        .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))
        .map_err(js_error)?;
    Ok(Raster::from_rgba8(size, &data.data())?)
}

#[derive(Debug)]
pub(crate) struct ColoringView {
    surface: DrawingSurface<Rc<Raster>>,
    /// Shown only once its pixels are loaded into `surface`.
    page: Option<ImageHandle>,
    pending: Option<ImageHandle>,
    theme: Option<usize>,
    loading: bool,
    failed: bool,
    requests: TicketGate,
    narrator: Narrator,
    container_ref: NodeRef,
    canvas_ref: NodeRef,
}

impl ColoringView {
    fn narrate(&self, ctx: &Context<Self>, text: &str) {
        let narrator = self.narrator.clone();
        let text = text.to_string();
        ctx.link()
            .send_future(async move { Msg::Narrated(narrator.say(text).await) });
    }

    fn start_request(&mut self, ctx: &Context<Self>, theme: usize) {
        let Some(prompt) = COLORING_THEMES.get(theme).map(|t| t.prompt) else {
            return;
        };
        let ticket = self.requests.issue();
        let studio = ctx.props().studio.clone();
        ctx.link().send_future(async move {
            Msg::Page(ticket, studio.generate_image(prompt).await)
        });
    }

    fn start_decode(&mut self, ctx: &Context<Self>, page: &ImageHandle) {
        let ticket = self.requests.issue();
        let url = page.data_url();
        ctx.link()
            .send_future(async move { Msg::Decoded(ticket, decode_page(url).await) });
    }

    fn container_size(&self) -> Option<(Coord, Coord)> {
        let container = self.container_ref.cast::<HtmlElement>()?;
        let width = Coord::try_from(container.client_width()).ok()?;
        let height = Coord::try_from(container.client_height()).ok()?;
        Some((width, height))
    }

    fn load_page(&mut self, raster: Raster) -> bool {
        let Some(size) = self.container_size() else {
            log::warn!("coloring container is gone, dropping page");
            return false;
        };
        self.surface.load_background(Rc::new(raster), size);
        if let Some(canvas) = self.canvas_ref.cast::<HtmlCanvasElement>() {
            // resizing also wipes the canvas
            canvas.set_width(size.0.into());
            canvas.set_height(size.1.into());
        }
        true
    }

    /// Copies `region` of the stroke layer onto the overlay canvas.
    fn blit(&self, region: Region) {
        let Some(canvas) = self.canvas_ref.cast::<HtmlCanvasElement>() else {
            return;
        };
        let bytes = self.surface.stroke_layer_rgba8(region);
        let result = context_2d(&canvas).and_then(|ctx| {
            let data = ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(&bytes),
                region.size.0.into(),
                region.size.1.into(),
            )?;
            ctx.put_image_data(
                &data,
                f64::from(region.origin.0),
                f64::from(region.origin.1),
            )
        });
        if let Err(err) = result {
            log::error!("failed to paint stroke: {:?}", err);
        }
    }

    fn clear_canvas(&self) {
        let Some(canvas) = self.canvas_ref.cast::<HtmlCanvasElement>() else {
            return;
        };
        match context_2d(&canvas) {
            Ok(ctx) => ctx.clear_rect(
                0.0,
                0.0,
                f64::from(canvas.width()),
                f64::from(canvas.height()),
            ),
            Err(err) => log::error!("failed to clear canvas: {:?}", err),
        }
    }

    fn download(&self) -> Result<(), JsValue> {
        let Some(raster) = self.surface.export_composite() else {
            return Ok(());
        };
        let (width, height) = raster.size();
        let canvas = create_canvas(width.into(), height.into())?;
        let data = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(&raster.to_rgba8()),
            width.into(),
            height.into(),
        )?;
        context_2d(&canvas)?.put_image_data(&data, 0.0, 0.0)?;
        let url = canvas.to_data_url_with_type("image/png")?;
        download(&url, EXPORT_FILE_NAME)
    }

    fn view_tools(&self, ctx: &Context<Self>) -> Html {
        let brush = self.surface.brush();
        html! {
            <div class="tools">
                <div class="palette">
                    {
                        for PALETTE.iter().map(|&color| {
                            let class = classes!("swatch", (brush.color == color).then_some("selected"));
                            let style = format!("background-color: {}", color.to_hex());
                            html! {
                                <button {class} {style} onclick={ctx.link().callback(move |_| Msg::SetColor(color))}/>
                            }
                        })
                    }
                </div>
                <div class="sizes">
                    {
                        for BrushSize::ALL.iter().map(|&size| {
                            let class = classes!("size", (brush.size == size).then_some("selected"));
                            let style = format!("width: {0}px; height: {0}px", size.width());
                            html! {
                                <button {class} onclick={ctx.link().callback(move |_| Msg::SetWidth(size))}>
                                    <span class="dot" {style}/>
                                </button>
                            }
                        })
                    }
                </div>
                <button title="Clear Drawing" onclick={ctx.link().callback(|_| Msg::Clear)}>{"🧽"}</button>
                <button title="Download" onclick={ctx.link().callback(|_| Msg::Download)}>{"💾"}</button>
            </div>
        }
    }
}

impl Component for ColoringView {
    type Message = Msg;
    type Properties = ColoringProps;

    fn create(ctx: &Context<Self>) -> Self {
        let view = Self {
            surface: DrawingSurface::new(),
            page: None,
            pending: None,
            theme: None,
            loading: false,
            failed: false,
            requests: TicketGate::new(),
            narrator: Narrator::new(ctx.props().studio.clone()),
            container_ref: NodeRef::default(),
            canvas_ref: NodeRef::default(),
        };
        view.narrate(ctx, COLORING_TITLE);
        view
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Create(theme) => {
                self.theme = Some(theme);
                self.page = None;
                self.pending = None;
                self.surface.unload_background();
                self.clear_canvas();
                self.loading = true;
                self.failed = false;
                self.start_request(ctx, theme);
                true
            }
            Page(ticket, result) => {
                if !self.requests.redeem(ticket) {
                    return false;
                }
                match result {
                    Ok(page) => {
                        self.start_decode(ctx, &page);
                        self.pending = Some(page);
                        let name = self.theme.and_then(|i| COLORING_THEMES.get(i).map(|t| t.name));
                        if let Some(name) = name {
                            self.narrate(ctx, name);
                        }
                    }
                    Err(err) => {
                        log::error!("coloring page failed: {}", err);
                        self.loading = false;
                        self.failed = true;
                    }
                }
                true
            }
            Decoded(ticket, result) => {
                if !self.requests.redeem(ticket) {
                    return false;
                }
                self.loading = false;
                let pending = self.pending.take();
                match result {
                    Ok(raster) => {
                        if self.load_page(raster) {
                            self.page = pending;
                        } else {
                            self.failed = true;
                        }
                    }
                    Err(err) => {
                        log::error!("coloring page could not be decoded: {}", err);
                        self.failed = true;
                    }
                }
                true
            }
            PointerDown(point, buttons) => {
                if buttons.contains(MouseButtons::LEFT) && self.surface.begin_stroke(point) {
                    log::trace!("pointer down at {:?}", point);
                }
                false
            }
            PointerMove(point, buttons) => {
                if !buttons.contains(MouseButtons::LEFT) {
                    self.surface.end_stroke();
                } else if let Some(region) = self.surface.extend_stroke(point) {
                    self.blit(region);
                }
                false
            }
            PointerUp => {
                self.surface.end_stroke();
                false
            }
            SetColor(color) => {
                self.surface.set_color(color);
                true
            }
            SetWidth(size) => {
                self.surface.set_width(size);
                true
            }
            Clear => {
                self.surface.clear();
                self.clear_canvas();
                false
            }
            Download => {
                if let Err(err) = self.download() {
                    log::error!("export failed: {:?}", err);
                }
                false
            }
            Narrated(result) => {
                if let Err(err) = result {
                    log::error!("theme narration failed: {}", err);
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let onpointerdown = ctx.link().callback(|e: PointerEvent| {
            let (point, buttons) = pointer_at(&e);
            Msg::PointerDown(point, buttons)
        });
        let onpointermove = ctx.link().callback(|e: PointerEvent| {
            let (point, buttons) = pointer_at(&e);
            Msg::PointerMove(point, buttons)
        });
        let onpointerup = ctx.link().callback(|_: PointerEvent| Msg::PointerUp);
        let onpointerleave = ctx.link().callback(|_: PointerEvent| Msg::PointerUp);

        html! {
            <div class="coloring">
                <h2>{COLORING_TITLE}</h2>
                <div class="themes">
                    {
                        for COLORING_THEMES.iter().enumerate().map(|(i, theme)| {
                            let class = classes!((self.theme == Some(i)).then_some("selected"));
                            html! {
                                <button {class} disabled={self.loading} onclick={ctx.link().callback(move |_| Msg::Create(i))}>
                                    {theme.name}
                                </button>
                            }
                        })
                    }
                </div>
                <div class="page" ref={self.container_ref.clone()}>
                    if let Some(page) = &self.page {
                        <img src={page.data_url()} alt="Coloring page"/>
                    }
                    if self.loading {
                        <p class="loading">{"Making Magic..."}</p>
                    } else if self.failed {
                        <p class="error">{"Could not make the page right now!"}</p>
                    }
                    <canvas ref={self.canvas_ref.clone()}
                        {onpointerdown} {onpointermove} {onpointerup} {onpointerleave}/>
                </div>
                {self.view_tools(ctx)}
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.requests.revoke();
        self.narrator.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_button_draws() {
        assert!(MouseButtons::from_bits_truncate(1).contains(MouseButtons::LEFT));
        assert!(!MouseButtons::from_bits_truncate(2).contains(MouseButtons::LEFT));
        assert_eq!(MouseButtons::from_bits_truncate(1 << 8), MouseButtons::empty());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn decodes_page_pixels() {
        let canvas = create_canvas(3, 2).unwrap();
        let ctx = context_2d(&canvas).unwrap();
        ctx.set_fill_style_str("#ff0000");
        ctx.fill_rect(0.0, 0.0, 3.0, 2.0);
        let url = canvas.to_data_url_with_type("image/png").unwrap();

        let raster = decode_page(url).await.unwrap();

        assert_eq!(raster.size(), (3, 2));
        assert_eq!(raster.pixel((2, 1)), [0xff, 0, 0, 0xff]);
    }

    #[wasm_bindgen_test]
    async fn undecodable_page_is_an_error() {
        assert!(decode_page("data:image/png;base64,AAAA".to_string()).await.is_err());
    }
}
