/// A type for representing strings. Text is immutable once allocated.
use std::fmt;

use crate::memory::MutatorScope;
use crate::printer::Print;

pub struct Text {
    content: String,
}

impl Text {
    /// Create an empty Text string object
    pub fn new_empty() -> Text {
        Text {
            content: String::new(),
        }
    }

    /// Initialize a Text object from a &str slice
    pub fn new_from_str(from_str: &str) -> Text {
        Text {
            content: String::from(from_str),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl Print for Text {
    fn print(&self, _guard: &dyn MutatorScope, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"")?;

        for c in self.content.chars() {
            match c {
                '"' => write!(f, "\\\"")?,
                '\\' => write!(f, "\\\\")?,
                '\n' => write!(f, "\\n")?,
                '\t' => write!(f, "\\t")?,
                c => write!(f, "{}", c)?,
            }
        }

        write!(f, "\"")
    }
}

#[cfg(test)]
mod test {
    use super::Text;
    use crate::error::RuntimeError;
    use crate::memory::{Memory, Mutator, MutatorView};

    #[test]
    fn text_empty_string() {
        let text = Text::new_empty();
        assert!(text.as_str() == "");
    }

    #[test]
    fn value_from_string() {
        let mem = Memory::new();

        struct Test {}
        impl Mutator for Test {
            type Input = ();
            type Output = ();

            fn run(
                &self,
                view: &MutatorView,
                _input: Self::Input,
            ) -> Result<Self::Output, RuntimeError> {
                let input = String::from("こんにちは");
                // the Value representation of the object is wrapped in quotes
                let expected = format!("\"{}\"", input);

                let got = format!("{}", view.alloc_text(&input));
                assert!(got == expected);

                let escaped = format!("{}", view.alloc_text("say \"hi\"\n"));
                assert_eq!(escaped, "\"say \\\"hi\\\"\\n\"");

                Ok(())
            }
        }

        let test = Test {};
        mem.mutate(&test, ()).unwrap();
    }
}
