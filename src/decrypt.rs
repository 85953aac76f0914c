//! Hero headline "decryption"
//!
//! Starts fully scrambled and settles left to right, one character every
//! three ticks. Character `i` is settled once `i < ticks / 3`, so the first
//! one appears on the second tick. Spaces never scramble.

use rand::Rng;

use crate::core::rng::pick;

#[derive(Clone, Debug)]
pub struct DecryptText {
    target: Vec<char>,
    charset: Vec<char>,
    /// Revealed prefix length in thirds of a character
    thirds: usize,
    done: bool,
    display: String,
}

impl DecryptText {
    pub fn new(text: &str, charset: &str) -> Self {
        let charset: Vec<char> = charset.chars().collect();
        let done = charset.is_empty();
        Self {
            target: text.chars().collect(),
            charset,
            thirds: 0,
            done,
            display: if done { text.to_string() } else { String::new() },
        }
    }

    pub fn text(&self) -> String {
        self.target.iter().collect()
    }

    /// What the element should currently show. Empty before the first tick,
    /// in which case hosts show the plain text.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Number of leading characters already settled, i.e. every index
    /// with `3·i < thirds`.
    pub fn revealed(&self) -> usize {
        self.thirds.div_ceil(3).min(self.target.len())
    }

    /// Produce the next frame.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &str {
        if self.done {
            return &self.display;
        }

        let revealed = self.revealed();
        let charset = &self.charset;
        self.display = self
            .target
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                if c == ' ' || i < revealed {
                    c
                } else {
                    pick(rng, charset.len()).map_or(c, |k| charset[k])
                }
            })
            .collect();

        self.thirds += 1;
        if self.thirds > self.target.len() * 3 {
            self.done = true;
            self.display = self.text();
        }
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CHARSET;
    use crate::core::seeded;

    #[test]
    fn settles_after_three_ticks_per_char_plus_one() {
        let mut rng = seeded(1);
        let mut dt = DecryptText::new("Vision", DEFAULT_CHARSET);
        let mut ticks = 0;
        while !dt.is_done() {
            dt.tick(&mut rng);
            ticks += 1;
            assert!(ticks <= 100, "never finished");
        }
        assert_eq!(ticks, 6 * 3 + 1);
        assert_eq!(dt.display(), "Vision");
        assert_eq!(dt.tick(&mut rng), "Vision");
    }

    #[test]
    fn keeps_spaces_and_length() {
        let mut rng = seeded(2);
        let mut dt = DecryptText::new("go big now", DEFAULT_CHARSET);
        for _ in 0..10 {
            let frame = dt.tick(&mut rng).to_string();
            assert_eq!(frame.chars().count(), 10);
            let spaces: Vec<usize> =
                frame.char_indices().filter(|(_, c)| *c == ' ').map(|(i, _)| i).collect();
            assert!(spaces.contains(&2) && spaces.contains(&6), "{frame:?}");
        }
    }

    #[test]
    fn revealed_prefix_is_exact() {
        let mut rng = seeded(3);
        let mut dt = DecryptText::new("ABCDEFGH", "x");
        for _ in 0..7 {
            dt.tick(&mut rng);
        }
        // The 7th frame was built with 6 thirds: A and B settled
        assert_eq!(dt.display(), "ABxxxxxx");
        // 7 thirds now, so C settles on the next frame
        assert_eq!(dt.revealed(), 3);
    }

    #[test]
    fn each_char_settles_one_tick_after_its_third() {
        let mut rng = seeded(5);
        let mut dt = DecryptText::new("ABCDEFGH", "x");
        let frames: Vec<String> = (0..8).map(|_| dt.tick(&mut rng).to_string()).collect();
        assert_eq!(
            frames,
            [
                "xxxxxxxx", "Axxxxxxx", "Axxxxxxx", "Axxxxxxx",
                "ABxxxxxx", "ABxxxxxx", "ABxxxxxx", "ABCxxxxx",
            ]
        );
    }

    #[test]
    fn last_char_settles_before_done() {
        let mut rng = seeded(6);
        let mut dt = DecryptText::new("AB", "x");
        let frames: Vec<String> = (0..7).map(|_| dt.tick(&mut rng).to_string()).collect();
        assert_eq!(frames, ["xx", "Ax", "Ax", "Ax", "AB", "AB", "AB"]);
        assert!(dt.is_done());
    }

    #[test]
    fn empty_charset_reveals_immediately() {
        let dt = DecryptText::new("Hello", "");
        assert!(dt.is_done());
        assert_eq!(dt.display(), "Hello");
    }

    #[test]
    fn empty_text_finishes_on_first_tick() {
        let mut rng = seeded(4);
        let mut dt = DecryptText::new("", DEFAULT_CHARSET);
        assert_eq!(dt.tick(&mut rng), "");
        assert!(dt.is_done());
    }
}
