use crate::audio::Narrator;
use crate::client::GeminiClient;
use futures_util::future::try_join_all;
use magicpals_core::{
    GenerationError, ImageHandle, STORY_FRAMES, STORY_TEXT, Studio, Ticket, TicketGate,
};
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Tell,
    Told(Result<(), GenerationError>),
    Paint,
    Painted(Ticket, Result<Vec<ImageHandle>, GenerationError>),
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct StoryProps {
    pub studio: GeminiClient,
}

#[derive(Debug)]
pub(crate) struct StoryView {
    narrator: Narrator,
    telling: bool,
    tell_failed: bool,
    frames: Vec<ImageHandle>,
    painting: bool,
    paint_failed: bool,
    requests: TicketGate,
}

impl Component for StoryView {
    type Message = Msg;
    type Properties = StoryProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            narrator: Narrator::new(ctx.props().studio.clone()),
            telling: false,
            tell_failed: false,
            frames: Vec::new(),
            painting: false,
            paint_failed: false,
            requests: TicketGate::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Tell if self.telling => {
                self.narrator.stop();
                self.telling = false;
                true
            }
            Tell => {
                self.telling = true;
                self.tell_failed = false;
                let narrator = self.narrator.clone();
                ctx.link()
                    .send_future(async move { Told(narrator.say(STORY_TEXT.to_string()).await) });
                true
            }
            Told(result) => {
                self.telling = false;
                if let Err(err) = result {
                    log::error!("story narration failed: {}", err);
                    self.tell_failed = true;
                }
                true
            }
            Paint => {
                let ticket = self.requests.issue();
                let studio = ctx.props().studio.clone();
                self.painting = true;
                self.paint_failed = false;
                self.frames.clear();
                ctx.link().send_future(async move {
                    let frames = try_join_all(
                        STORY_FRAMES
                            .iter()
                            .map(|prompt| studio.generate_image(prompt)),
                    )
                    .await;
                    Painted(ticket, frames)
                });
                true
            }
            Painted(ticket, result) => {
                if !self.requests.redeem(ticket) {
                    return false;
                }
                self.painting = false;
                match result {
                    Ok(frames) => self.frames = frames,
                    Err(err) => {
                        log::error!("story pictures failed: {}", err);
                        self.paint_failed = true;
                    }
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="story">
                <h2>{"Story Time"}</h2>
                <div class="text">
                    { for STORY_TEXT.lines().map(|line| html! { <p>{line}</p> }) }
                </div>
                <div class="controls">
                    <button onclick={ctx.link().callback(|_| Msg::Tell)}>
                        { if self.telling { "⏹ Stop" } else { "🔊 Read to Me" } }
                    </button>
                    <button disabled={self.painting} onclick={ctx.link().callback(|_| Msg::Paint)}>
                        {"🎨 Paint the Story"}
                    </button>
                </div>
                if self.tell_failed {
                    <p class="error">{"Could not tell the story right now."}</p>
                }
                if self.paint_failed {
                    <p class="error">{"Could not paint the story pictures right now."}</p>
                }
                if self.painting {
                    <p class="loading">{"Painting..."}</p>
                }
                <div class="frames">
                    {
                        for self.frames.iter().enumerate().map(|(i, frame)| html! {
                            <img src={frame.data_url()} alt={format!("Story picture {}", i + 1)}/>
                        })
                    }
                </div>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.requests.revoke();
        self.narrator.stop();
    }
}
