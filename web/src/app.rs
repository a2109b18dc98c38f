use crate::audio::Narrator;
use crate::client::GeminiClient;
use crate::coloring::ColoringView;
use crate::friends::FriendsView;
use crate::movie::MovieView;
use crate::puzzles::PuzzleView;
use crate::story::StoryView;
use magicpals_core::{GenerationError, WELCOME_TEXT};
use yew::prelude::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Screen {
    #[default]
    Home,
    Friends,
    Story,
    Puzzles,
    Coloring,
    Movie,
}

impl Screen {
    pub(crate) const ALL: [Screen; 6] = [
        Screen::Home,
        Screen::Friends,
        Screen::Story,
        Screen::Puzzles,
        Screen::Coloring,
        Screen::Movie,
    ];

    pub(crate) const fn label(self) -> &'static str {
        use Screen::*;
        match self {
            Home => "Home",
            Friends => "Friends",
            Story => "Story",
            Puzzles => "Game",
            Coloring => "Color",
            Movie => "Movie",
        }
    }

    pub(crate) const fn icon(self) -> &'static str {
        use Screen::*;
        match self {
            Home => "🏠",
            Friends => "🐱",
            Story => "📖",
            Puzzles => "🧩",
            Coloring => "🎨",
            Movie => "🎬",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Navigate(Screen),
    Welcome,
    Welcomed(Result<(), GenerationError>),
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct AppProps {
    pub seed: u64,
    pub studio: GeminiClient,
}

#[derive(Debug)]
pub(crate) struct App {
    screen: Screen,
    /// Lives as long as the app so the welcome clip is synthesized once.
    welcome: Narrator,
    welcoming: bool,
}

impl App {
    fn view_home(&self, ctx: &Context<Self>) -> Html {
        let onmouseenter = ctx.link().callback(|_: MouseEvent| Msg::Welcome);
        let onclick = ctx.link().callback(|_| Msg::Navigate(Screen::Friends));
        html! {
            <div class="home">
                <div class="sparkle">{"✨"}</div>
                <h2>{"Welcome Explorer!"}</h2>
                <p>{"Pick a button below to start your Magic Animal Adventure!"}</p>
                <button class="go" {onmouseenter} {onclick}>
                    { if self.welcoming { "⏳" } else { "🔊" } }
                    {" Let's Go! 🚀"}
                </button>
            </div>
        }
    }

    fn view_screen(&self, ctx: &Context<Self>) -> Html {
        let AppProps { seed, studio } = ctx.props().clone();
        match self.screen {
            Screen::Home => self.view_home(ctx),
            Screen::Friends => html! { <FriendsView {studio}/> },
            Screen::Story => html! { <StoryView {studio}/> },
            Screen::Puzzles => html! { <PuzzleView {seed} {studio}/> },
            Screen::Coloring => html! { <ColoringView {studio}/> },
            Screen::Movie => html! { <MovieView {studio}/> },
        }
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = AppProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            screen: Screen::Home,
            welcome: Narrator::new(ctx.props().studio.clone()),
            welcoming: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Navigate(screen) => {
                if self.screen == screen {
                    return false;
                }
                log::debug!("navigate to {:?}", screen);
                self.welcome.stop();
                self.screen = screen;
                true
            }
            Welcome if self.welcoming => false,
            Welcome => {
                self.welcoming = true;
                let narrator = self.welcome.clone();
                ctx.link().send_future(async move {
                    Welcomed(narrator.say(WELCOME_TEXT.to_string()).await)
                });
                true
            }
            Welcomed(result) => {
                self.welcoming = false;
                if let Err(err) = result {
                    log::error!("welcome narration failed: {}", err);
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="magic-pals">
                <header>
                    <h1>{"🦁 Magic Animal Adventure"}</h1>
                </header>
                <main>
                    {self.view_screen(ctx)}
                </main>
                <nav>
                    {
                        for Screen::ALL.iter().map(|&screen| {
                            let class = classes!(format!("nav-{}", screen.label().to_lowercase()), (self.screen == screen).then_some("active"));
                            html! {
                                <button {class} onclick={ctx.link().callback(move |_| Msg::Navigate(screen))}>
                                    <span class="icon">{screen.icon()}</span>
                                    <span class="label">{screen.label()}</span>
                                </button>
                            }
                        })
                    }
                </nav>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_screen_has_distinct_label() {
        let mut labels: Vec<_> = Screen::ALL.iter().map(|s| s.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), Screen::ALL.len());
        assert_eq!(Screen::default(), Screen::Home);
    }
}
