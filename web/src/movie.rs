use crate::client::GeminiClient;
use crate::utils::millis;
use futures_util::future::try_join_all;
use gloo::file::ObjectUrl;
use gloo::timers::callback::Interval;
use magicpals_core::{
    AspectRatio, FRAME_INTERVAL, Flipbook, GenerationError, ImageHandle, MOVIE_PROMPT, Studio,
    Ticket, TicketGate, flipbook_prompts,
};
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub(crate) enum Msg {
    MakeFlipbook,
    Frames(Ticket, Result<Vec<ImageHandle>, GenerationError>),
    Tick,
    MakeVideo,
    Video(Ticket, Result<ObjectUrl, GenerationError>),
    KeyText(String),
    SaveKey,
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct MovieProps {
    pub studio: GeminiClient,
}

enum Screen {
    Empty,
    Flipbook(Flipbook<ImageHandle>, Interval),
    Video(ObjectUrl),
}

pub(crate) struct MovieView {
    screen: Screen,
    loading: bool,
    failure: Option<&'static str>,
    asking_key: bool,
    key_input: String,
    requests: TicketGate,
}

impl MovieView {
    fn make_flipbook(&mut self, ctx: &Context<Self>) {
        let ticket = self.requests.issue();
        let studio = ctx.props().studio.clone();
        ctx.link().send_future(async move {
            let prompts = flipbook_prompts();
            let frames = try_join_all(prompts.iter().map(|prompt| studio.generate_image(prompt))).await;
            Msg::Frames(ticket, frames)
        });
    }

    fn make_video(&mut self, ctx: &Context<Self>) {
        let ticket = self.requests.issue();
        let studio = ctx.props().studio.clone();
        ctx.link().send_future(async move {
            let video = studio
                .generate_video(MOVIE_PROMPT, AspectRatio::Landscape)
                .await;
            Msg::Video(ticket, video)
        });
    }

    fn begin(&mut self) {
        self.screen = Screen::Empty;
        self.loading = true;
        self.failure = None;
    }

    fn view_screen(&self) -> Html {
        if self.loading {
            return html! { <p class="loading">{"Lights, Camera, Action!"}</p> };
        }
        match &self.screen {
            Screen::Empty => html! { <p class="empty">{"🎬 No movie playing"}</p> },
            Screen::Flipbook(book, _) => match book.current() {
                Some(frame) => html! { <img src={frame.data_url()} alt="Animation Frame"/> },
                None => html! {},
            },
            Screen::Video(url) => html! {
                <video src={url.to_string()} controls={true} autoplay={true} loop={true}/>
            },
        }
    }

    fn view_key_prompt(&self, ctx: &Context<Self>) -> Html {
        let oninput = ctx.link().callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::KeyText(input.value())
        });
        html! {
            <div class="key-prompt">
                <p>{"Movies need an API key from a paid project."}</p>
                <input type="password" placeholder="API key" value={self.key_input.clone()} {oninput}/>
                <button disabled={self.key_input.trim().is_empty()}
                    onclick={ctx.link().callback(|_| Msg::SaveKey)}>{"🔑 Use this key"}</button>
            </div>
        }
    }
}

impl Component for MovieView {
    type Message = Msg;
    type Properties = MovieProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            screen: Screen::Empty,
            loading: false,
            failure: None,
            asking_key: false,
            key_input: String::new(),
            requests: TicketGate::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            MakeFlipbook => {
                self.begin();
                self.make_flipbook(ctx);
                true
            }
            Frames(ticket, result) => {
                if !self.requests.redeem(ticket) {
                    return false;
                }
                self.loading = false;
                match result {
                    Ok(frames) => {
                        let link = ctx.link().clone();
                        let interval =
                            Interval::new(millis(FRAME_INTERVAL), move || link.send_message(Tick));
                        self.screen = Screen::Flipbook(Flipbook::new(frames), interval);
                    }
                    Err(err) => {
                        log::error!("flipbook failed: {}", err);
                        self.failure = Some("Could not make the flipbook right now.");
                    }
                }
                true
            }
            Tick => match &mut self.screen {
                Screen::Flipbook(book, _) => book.advance(),
                _ => false,
            },
            MakeVideo if !ctx.props().studio.has_api_key() => {
                self.asking_key = true;
                true
            }
            MakeVideo => {
                self.begin();
                self.make_video(ctx);
                true
            }
            Video(ticket, result) => {
                if !self.requests.redeem(ticket) {
                    return false;
                }
                self.loading = false;
                match result {
                    Ok(url) => self.screen = Screen::Video(url),
                    Err(err) => {
                        log::error!("video failed: {}", err);
                        self.asking_key = err.is_entitlement();
                        self.failure = Some(
                            "Video creation failed. Make sure you selected a paid project key!",
                        );
                    }
                }
                true
            }
            KeyText(text) => {
                self.key_input = text;
                true
            }
            SaveKey => {
                let key = self.key_input.trim();
                if key.is_empty() {
                    return false;
                }
                ctx.props().studio.set_api_key(key);
                self.key_input.clear();
                self.asking_key = false;
                self.begin();
                self.make_video(ctx);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="movie">
                <h2>{"Movie Maker"}</h2>
                <p class="hint">{"Create a magical intro for Lily!"}</p>
                <div class="screen">{self.view_screen()}</div>
                if let Some(failure) = self.failure {
                    <p class="error">{failure}</p>
                }
                if self.asking_key {
                    {self.view_key_prompt(ctx)}
                }
                <div class="controls">
                    <button disabled={self.loading} onclick={ctx.link().callback(|_| Msg::MakeFlipbook)}>
                        {"📚 Magic Flipbook"}
                    </button>
                    <button disabled={self.loading} onclick={ctx.link().callback(|_| Msg::MakeVideo)}>
                        {"🎥 Real Movie"}
                    </button>
                </div>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.requests.revoke();
    }
}
