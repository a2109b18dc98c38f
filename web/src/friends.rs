use crate::audio::Narrator;
use crate::client::GeminiClient;
use magicpals_core::{FRIENDS, Friend, GenerationError, ImageHandle, Studio, Ticket, TicketGate};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Meet(usize),
    Portrait(Ticket, Result<ImageHandle, GenerationError>),
    EditText(String),
    ToggleEdit,
    Edit,
    Greeted(Result<(), GenerationError>),
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct FriendsProps {
    pub studio: GeminiClient,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Failure {
    Portrait,
    Edit,
}

impl Failure {
    const fn message(self) -> &'static str {
        match self {
            Self::Portrait => "Oops! Could not make the picture. Try again?",
            Self::Edit => "Magic wand fizzled! Try a different spell.",
        }
    }
}

#[derive(Debug)]
pub(crate) struct FriendsView {
    selected: Option<Friend>,
    portrait: Option<ImageHandle>,
    instruction: String,
    editing: bool,
    loading: bool,
    failure: Option<Failure>,
    /// Whether the pending portrait request is an edit rather than a fresh portrait.
    pending_edit: bool,
    requests: TicketGate,
    narrator: Narrator,
}

impl FriendsView {
    fn request(&mut self, ctx: &Context<Self>, edit: Option<(ImageHandle, String)>) {
        let Some(friend) = self.selected else {
            return;
        };
        let ticket = self.requests.issue();
        let studio = ctx.props().studio.clone();
        self.loading = true;
        self.failure = None;
        self.pending_edit = edit.is_some();

        ctx.link().send_future(async move {
            let result = match edit {
                Some((image, instruction)) => studio.edit_image(&image, &instruction).await,
                None => studio.generate_image(friend.prompt).await,
            };
            Msg::Portrait(ticket, result)
        });
    }

    fn greet(&self, ctx: &Context<Self>, friend: Friend) {
        let narrator = self.narrator.clone();
        ctx.link()
            .send_future(async move { Msg::Greeted(narrator.say(friend.greeting()).await) });
    }

    fn view_edit(&self, ctx: &Context<Self>) -> Html {
        if !self.editing {
            return html! {
                <button class="magic-wand" onclick={ctx.link().callback(|_| Msg::ToggleEdit)}>
                    {"🪄 Change with Magic"}
                </button>
            };
        }

        let oninput = ctx.link().callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::EditText(input.value())
        });
        let onkeydown = ctx.link().batch_callback(|e: KeyboardEvent| {
            (e.key() == "Enter").then_some(Msg::Edit)
        });

        html! {
            <div class="edit">
                <input type="text" placeholder="Add a party hat..."
                    value={self.instruction.clone()} {oninput} {onkeydown}/>
                <button disabled={self.instruction.trim().is_empty()}
                    onclick={ctx.link().callback(|_| Msg::Edit)}>{"Go!"}</button>
            </div>
        }
    }
}

impl Component for FriendsView {
    type Message = Msg;
    type Properties = FriendsProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            selected: None,
            portrait: None,
            instruction: String::new(),
            editing: false,
            loading: false,
            failure: None,
            pending_edit: false,
            requests: TicketGate::new(),
            narrator: Narrator::new(ctx.props().studio.clone()),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Meet(index) => {
                let Some(&friend) = FRIENDS.get(index) else {
                    return false;
                };
                log::debug!("meet {}", friend.id);
                self.selected = Some(friend);
                self.portrait = None;
                self.editing = false;
                self.request(ctx, None);
                true
            }
            Portrait(ticket, result) => {
                if !self.requests.redeem(ticket) {
                    return false;
                }
                self.loading = false;
                match result {
                    Ok(image) => {
                        self.portrait = Some(image);
                        if self.pending_edit {
                            self.instruction.clear();
                            self.editing = false;
                        } else if let Some(friend) = self.selected {
                            self.greet(ctx, friend);
                        }
                    }
                    Err(err) => {
                        log::error!("portrait request failed: {}", err);
                        self.failure = Some(if self.pending_edit {
                            Failure::Edit
                        } else {
                            Failure::Portrait
                        });
                    }
                }
                true
            }
            EditText(text) => {
                self.instruction = text;
                false
            }
            ToggleEdit => {
                self.editing = !self.editing;
                true
            }
            Edit => {
                let instruction = self.instruction.trim().to_string();
                match self.portrait.clone() {
                    Some(image) if !instruction.is_empty() && !self.loading => {
                        self.request(ctx, Some((image, instruction)));
                        true
                    }
                    _ => false,
                }
            }
            Greeted(result) => {
                if let Err(err) = result {
                    log::error!("voice failed: {}", err);
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="friends">
                <h2>{"Meet Your Friends!"}</h2>
                <div class="grid">
                    {
                        for FRIENDS.iter().enumerate().map(|(i, friend)| {
                            let class = classes!(self.selected.is_some_and(|s| s.id == friend.id).then_some("selected"));
                            let style = format!("color: {}", friend.color.to_hex());
                            html! {
                                <button {class} disabled={self.loading} onclick={ctx.link().callback(move |_| Msg::Meet(i))}>
                                    <div class="name" {style}>{friend.name}</div>
                                    <div class="role">{friend.role}</div>
                                </button>
                            }
                        })
                    }
                </div>
                <div class="portrait">
                    if self.loading {
                        <p class="loading">{"Making Magic..."}</p>
                    } else if let Some(portrait) = &self.portrait {
                        <img src={portrait.data_url()} alt={self.selected.map(|f| f.name).unwrap_or_default()}/>
                    } else if let Some(failure) = self.failure {
                        <p class="error">{failure.message()}</p>
                    } else {
                        <p class="hint">{"Pick a friend to say hello!"}</p>
                    }
                </div>
                if self.portrait.is_some() && !self.loading {
                    {self.view_edit(ctx)}
                }
                if let (Some(failure), Some(_)) = (self.failure, &self.portrait) {
                    <p class="error">{failure.message()}</p>
                }
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.requests.revoke();
        self.narrator.stop();
    }
}
