use crate::audio::Narrator;
use crate::client::GeminiClient;
use crate::utils::millis;
use gloo::timers::callback::Timeout;
use magicpals_core::{
    AdvanceOutcome, CODE_LEGEND, CODE_LENGTH, CODE_PUZZLES, CodePuzzle, GenerationError,
    MENU_TITLE, PuzzleInstance, PuzzleKind, PuzzleSession, Status, SubmitOutcome, Symbol, Ticket,
    WRONG_ANSWER_DELAY,
};
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Select(PuzzleKind),
    Digit(u8),
    ClearDigits,
    Pick(Symbol),
    WrongOver(Ticket),
    Next,
    Menu,
    Narrated(Result<(), GenerationError>),
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct PuzzleProps {
    pub seed: u64,
    pub studio: GeminiClient,
}

/// Keypad boxes: typed digits first, then blanks.
fn digit_slots(typed: &[u8]) -> [Option<u8>; CODE_LENGTH] {
    std::array::from_fn(|i| typed.get(i).copied())
}

#[derive(Debug)]
pub(crate) struct PuzzleView {
    session: PuzzleSession,
    narrator: Narrator,
    wrong_timer: Option<Timeout>,
}

impl PuzzleView {
    fn narrate(&self, ctx: &Context<Self>, text: &str) {
        let narrator = self.narrator.clone();
        let text = text.to_string();
        ctx.link()
            .send_future(async move { Msg::Narrated(narrator.say(text).await) });
    }

    fn on_submit(&mut self, ctx: &Context<Self>, outcome: SubmitOutcome) -> bool {
        if let SubmitOutcome::Wrong(ticket) = outcome {
            let link = ctx.link().clone();
            self.wrong_timer = Some(Timeout::new(millis(WRONG_ANSWER_DELAY), move || {
                link.send_message(Msg::WrongOver(ticket))
            }));
        }
        outcome.has_update()
    }

    fn view_code(&self, ctx: &Context<Self>, puzzle: &CodePuzzle) -> Html {
        let correct = self.session.status() == Status::Correct;
        let slots = digit_slots(self.session.typed_digits());

        html! {
            <div class="secret-code">
                <h3>{PuzzleKind::SecretCode.title()}</h3>
                <p class="level">{format!("Level {} / {}", self.session.level() + 1, CODE_PUZZLES.len())}</p>
                <div class="legend">
                    {
                        for CODE_LEGEND.iter().map(|entry| html! {
                            <div>
                                <span class="emoji">{entry.symbol.emoji()}</span>
                                <span>{format!("= {}", entry.value)}</span>
                            </div>
                        })
                    }
                </div>
                <div class="sequence">
                    { for puzzle.sequence.iter().map(|symbol| html! { <span class="emoji">{symbol.emoji()}</span> }) }
                </div>
                <div class={classes!("slots", correct.then_some("correct"))}>
                    { for slots.iter().map(|slot| html! { <div class="slot">{slot.map(|d| d.to_string()).unwrap_or_default()}</div> }) }
                </div>
                if !correct {
                    <div class="keypad">
                        {
                            for CODE_LEGEND.iter().map(|entry| {
                                let digit = entry.value;
                                html! {
                                    <button onclick={ctx.link().callback(move |_| Msg::Digit(digit))}>{digit.to_string()}</button>
                                }
                            })
                        }
                        <button class="erase" onclick={ctx.link().callback(|_| Msg::ClearDigits)}>{"X"}</button>
                    </div>
                }
            </div>
        }
    }

    fn view_choices(&self, ctx: &Context<Self>, choices: &[Symbol]) -> Html {
        html! {
            <div class="choices">
                {
                    for choices.iter().map(|&symbol| html! {
                        <button class="emoji" title={symbol.name()} onclick={ctx.link().callback(move |_| Msg::Pick(symbol))}>
                            {symbol.emoji()}
                        </button>
                    })
                }
            </div>
        }
    }

    fn view_instance(&self, ctx: &Context<Self>, instance: &PuzzleInstance) -> Html {
        let title = instance.kind().title();
        match instance {
            PuzzleInstance::SecretCode { puzzle } => self.view_code(ctx, puzzle),
            PuzzleInstance::Pattern {
                sequence, options, ..
            } => html! {
                <div class="pattern">
                    <h3>{title}</h3>
                    <div class="sequence">
                        { for sequence.iter().map(|symbol| html! { <span class="emoji">{symbol.emoji()}</span> }) }
                        <span class="emoji unknown">{"?"}</span>
                    </div>
                    {self.view_choices(ctx, options)}
                </div>
            },
            PuzzleInstance::OddOneOut { items, .. } => html! {
                <div class="odd-one-out">
                    <h3>{title}</h3>
                    {self.view_choices(ctx, items)}
                </div>
            },
            PuzzleInstance::Shadow { target, options } => html! {
                <div class="shadow-match">
                    <h3>{title}</h3>
                    <span class="emoji silhouette">{target.emoji()}</span>
                    {self.view_choices(ctx, options)}
                </div>
            },
        }
    }

    fn view_menu(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="puzzle-menu">
                <h2>{MENU_TITLE}</h2>
                <div class="grid">
                    {
                        for PuzzleKind::ALL.iter().map(|&kind| html! {
                            <button class={format!("kind-{:?}", kind).to_lowercase()}
                                onclick={ctx.link().callback(move |_| Msg::Select(kind))}>
                                {kind.label()}
                            </button>
                        })
                    }
                </div>
            </div>
        }
    }
}

impl Component for PuzzleView {
    type Message = Msg;
    type Properties = PuzzleProps;

    fn create(ctx: &Context<Self>) -> Self {
        let PuzzleProps { seed, studio } = ctx.props().clone();
        let view = Self {
            session: PuzzleSession::with_seed(seed),
            narrator: Narrator::new(studio),
            wrong_timer: None,
        };
        view.narrate(ctx, MENU_TITLE);
        view
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Select(kind) => {
                self.wrong_timer = None;
                self.session.select_game(kind);
                self.narrate(ctx, kind.title());
                true
            }
            Digit(digit) => {
                let outcome = self.session.submit_digit(digit);
                self.on_submit(ctx, outcome)
            }
            ClearDigits => self.session.clear_digits(),
            Pick(symbol) => {
                let outcome = self.session.submit_option(symbol);
                self.on_submit(ctx, outcome)
            }
            WrongOver(ticket) => {
                self.wrong_timer = None;
                self.session.resolve_wrong(ticket)
            }
            Next => match self.session.advance() {
                AdvanceOutcome::NoChange => false,
                AdvanceOutcome::NextLevel => true,
                AdvanceOutcome::Finished => {
                    self.narrate(ctx, MENU_TITLE);
                    true
                }
            },
            Menu => {
                self.wrong_timer = None;
                self.session.return_to_menu();
                self.narrate(ctx, MENU_TITLE);
                true
            }
            Narrated(result) => {
                if let Err(err) = result {
                    log::error!("puzzle narration failed: {}", err);
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(instance) = self.session.instance() else {
            return self.view_menu(ctx);
        };

        html! {
            <div class="puzzles">
                <div class="bar">
                    <button onclick={ctx.link().callback(|_| Msg::Menu)}>{"← Menu"}</button>
                    <span class="score">{format!("Score: {}", self.session.score())}</span>
                </div>
                <div class="board">
                    {
                        match self.session.status() {
                            Status::Correct => html! {
                                <div class="overlay correct">
                                    <h3>{"Great Job!"}</h3>
                                    <button onclick={ctx.link().callback(|_| Msg::Next)}>{"Next Puzzle →"}</button>
                                </div>
                            },
                            Status::Wrong => html! { <div class="overlay wrong">{"✖"}</div> },
                            Status::Playing => html! {},
                        }
                    }
                    {self.view_instance(ctx, instance)}
                </div>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.narrator.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_fill_left_to_right() {
        assert_eq!(digit_slots(&[]), [None, None, None]);
        assert_eq!(digit_slots(&[3, 1]), [Some(3), Some(1), None]);
        assert_eq!(digit_slots(&[2, 3, 1]), [Some(2), Some(3), Some(1)]);
    }
}
