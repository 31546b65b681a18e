/// A line typed on stdin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
	/// `select 2`, `click 2` or just `2`
	SelectVideo(usize),
	State,
	Quit,
	Empty,
	Unknown(String),
}

impl Input {
	pub fn parse(line: &str) -> Self {
		let mut words = line.split_whitespace();
		let Some(first) = words.next() else { return Self::Empty };

		if let Ok(index) = first.parse::<usize>() {
			return Self::SelectVideo(index);
		}

		match (first.to_ascii_lowercase().as_str(), words.next()) {
			("select" | "click", Some(arg)) => arg.parse().map_or_else(|_| Self::Unknown(line.trim().to_string()), Self::SelectVideo),
			("state" | "status", None) => Self::State,
			("quit" | "exit" | "q", None) => Self::Quit,
			_ => Self::Unknown(line.trim().to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_selection_forms() {
		assert_eq!(Input::parse("2"), Input::SelectVideo(2));
		assert_eq!(Input::parse("  select 0 "), Input::SelectVideo(0));
		assert_eq!(Input::parse("CLICK 3"), Input::SelectVideo(3));
	}

	#[test]
	fn parses_control_words() {
		assert_eq!(Input::parse("state"), Input::State);
		assert_eq!(Input::parse("quit"), Input::Quit);
		assert_eq!(Input::parse("   "), Input::Empty);
		assert_eq!(Input::parse("select two"), Input::Unknown("select two".into()));
		assert_eq!(Input::parse("dance"), Input::Unknown("dance".into()));
	}
}
