//! Fixed content: characters, prompts and narration text.

use alloc::{format, string::String};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Friend {
    pub id: &'static str,
    pub name: &'static str,
    pub role: &'static str,
    /// Text color of the friend's button, from [`PALETTE`].
    pub color: Color,
    pub prompt: &'static str,
}

impl Friend {
    /// What the friend says when their portrait appears.
    pub fn greeting(&self) -> String {
        format!("Hi! I am {}!", self.name)
    }
}

pub const FRIENDS: [Friend; 4] = [
    Friend {
        id: "lily",
        name: "Lily the Cat",
        role: "Explorer",
        color: Color::PINK,
        prompt: "Lily the Cat Explorer, Cartoon style, Friendly smile, Simple shapes, \
                 Bright colors, white background",
    },
    Friend {
        id: "bobo",
        name: "Bobo the Bear",
        role: "Scientist",
        color: Color::BLUE,
        prompt: "Bobo the Bear Scientist, Wearing glasses, Cute, round shapes, white background",
    },
    Friend {
        id: "mimi",
        name: "Mimi the Rabbit",
        role: "Artist",
        color: Color::PURPLE,
        prompt: "Mimi the Rabbit Artist, Holding a paintbrush, cute cartoon, white background",
    },
    Friend {
        id: "zuzu",
        name: "Zuzu the Bird",
        role: "Adventurer",
        color: Color::GREEN,
        prompt: "Zuzu the Bird Adventurer, Colorful wings, Excited expression, cartoon, \
                 white background",
    },
];

/// Heading of the coloring screen, announced when it opens.
pub const COLORING_TITLE: &str = "Coloring Fun";

/// A coloring page; the name is also what gets announced when the page is ready.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColoringTheme {
    pub name: &'static str,
    pub prompt: &'static str,
}

pub const COLORING_THEMES: [ColoringTheme; 4] = [
    ColoringTheme {
        name: "Lily the Cat",
        prompt: "Black and white thick line art coloring page of Lily the Cat Explorer, \
                 big outline, no shading, no background clutter, white background, \
                 children coloring book style, 1024x1024",
    },
    ColoringTheme {
        name: "Bobo the Bear",
        prompt: "Black and white thick line art coloring page of Bobo the Bear Scientist \
                 holding a beaker, thick lines, no shading, no background clutter, \
                 white background, children coloring book style, 1024x1024",
    },
    ColoringTheme {
        name: "Mimi the Rabbit",
        prompt: "Black and white thick line art coloring page of Mimi the Rabbit Artist \
                 painting on a canvas, thick lines, no shading, no background clutter, \
                 white background, children coloring book style, 1024x1024",
    },
    ColoringTheme {
        name: "Zuzu the Bird",
        prompt: "Black and white thick line art coloring page of Zuzu the Bird flying \
                 above clouds, thick lines, no shading, no background clutter, \
                 white background, children coloring book style, 1024x1024",
    },
];

pub const WELCOME_TEXT: &str =
    "Welcome Explorer! Pick a button below to start your Magic Animal Adventure! Let's Go!";

pub const STORY_TEXT: &str = "Welcome to Magic Animal Adventure!
Choose your favorite friend and let’s begin our journey!
We will read a fun story, solve puzzles, color pictures, and discover secret codes together.
Are you ready, explorer? Let’s go!";

pub const STORY_FRAMES: [&str; 4] = [
    "Cartoon illustration of Lily the Cat Explorer waving hello, happy expression, \
     bright colors, children book style",
    "Cartoon illustration of Lily the Cat Explorer walking into a magical colorful forest, \
     children book style",
    "Cartoon illustration of Lily the Cat Explorer discovering a glowing treasure chest \
     in the woods, children book style",
    "Cartoon illustration of Lily the Cat Explorer smiling proudly holding the treasure, \
     children book style",
];

const FLIPBOOK_BASE_PROMPT: &str = "Cartoon illustration of Lily the Cat Explorer in a \
                                    colorful forest background, simple flat vector art, \
                                    children book style, white border";

const FLIPBOOK_POSES: [&str; 3] = [
    "standing still smiling",
    "raising right hand to wave hello",
    "waving hand high in the air",
];

/// One prompt per flipbook frame, in playback order.
pub fn flipbook_prompts() -> [String; 3] {
    FLIPBOOK_POSES.map(|pose| format!("{FLIPBOOK_BASE_PROMPT}, {pose}"))
}

pub const MOVIE_PROMPT: &str = "Lily the Cat Explorer waving hello in a colorful forest \
                                background. Cartoon style, cute movement, vibrant colors.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_uses_full_name() {
        assert_eq!(FRIENDS[1].greeting(), "Hi! I am Bobo the Bear!");
    }

    #[test]
    fn friend_colors_come_from_palette() {
        for friend in FRIENDS {
            assert!(PALETTE.contains(&friend.color), "{}", friend.id);
        }
    }

    #[test]
    fn flipbook_prompts_share_base() {
        let prompts = flipbook_prompts();
        assert!(prompts.iter().all(|p| p.starts_with(FLIPBOOK_BASE_PROMPT)));
        assert!(prompts[1].ends_with(", raising right hand to wave hello"));
    }

    #[test]
    fn coloring_title_is_not_a_theme_name() {
        assert!(COLORING_THEMES.iter().all(|theme| theme.name != COLORING_TITLE));
    }

    #[test]
    fn continued_lines_keep_single_spaces() {
        assert!(!COLORING_THEMES[0].prompt.contains("  "));
        assert!(!MOVIE_PROMPT.contains("  "));
    }
}
