use crate::parser::*;

#[test]
fn tokenize_handles_quotes_and_escapes() {
	assert_eq!(
		tokenize(r#"'a b' "c\"d""#),
		vec!["a b".to_string(), "c\"d".to_string()]
	);
}

#[test]
fn tokenize_literal_backslash_inside_single_quotes() {
	assert_eq!(tokenize(r"'a\nb'"), vec![r"a\nb".to_string()]);
}

#[test]
fn split_pipeline_matches_two_char_before_one_char() {
	let (segments, ops) = split_pipeline("a || b && c | d ; e");
	assert_eq!(segments.len(), 5);
	assert_eq!(ops, vec![Operator::Or, Operator::And, Operator::Pipe, Operator::Seq]);
}

#[test]
fn split_pipeline_tolerates_trailing_operator() {
	let (segments, ops) = split_pipeline("echo hi ;");
	assert_eq!(segments.len(), 2);
	assert!(segments[1].is_empty());
	assert_eq!(ops, vec![Operator::Seq]);
}

#[test]
fn parse_command_long_flag_with_equals() {
	let cmd = parse_command(&tokenize("grep --color=always foo"));
	assert_eq!(
		cmd.flags.get("color"),
		Some(&FlagValue::Value("always".to_string()))
	);
	assert_eq!(cmd.args, vec!["foo".to_string()]);
}

#[test]
fn parse_command_long_flag_consumes_following_token() {
	let cmd = parse_command(&tokenize("find . --name test.rs"));
	assert_eq!(
		cmd.flags.get("name"),
		Some(&FlagValue::Value("test.rs".to_string()))
	);
}

#[test]
fn parse_command_long_flag_no_value_is_bool() {
	let cmd = parse_command(&tokenize("ls --all"));
	assert_eq!(cmd.flags.get("all"), Some(&FlagValue::Bool(true)));
}

#[test]
fn parse_command_short_flag_coalescing() {
	let cmd = parse_command(&tokenize("ls -la"));
	assert!(cmd.flag_bool("l"));
	assert!(cmd.flag_bool("a"));
}

#[test]
fn parse_command_negative_number_is_not_a_flag() {
	let cmd = parse_command(&tokenize("head -n -5"));
	assert!(cmd.flags.contains_key("n"));
	assert_eq!(cmd.raw_args, "-n -5");
}

#[test]
fn parse_command_redirections() {
	let cmd = parse_command(&tokenize("echo hi > /tmp/x"));
	assert_eq!(
		cmd.output_redirect,
		Some(OutputRedirect {
			path: "/tmp/x".to_string(),
			append: false
		})
	);
	let cmd = parse_command(&tokenize("cat >> /tmp/x"));
	assert_eq!(
		cmd.output_redirect,
		Some(OutputRedirect {
			path: "/tmp/x".to_string(),
			append: true
		})
	);
	let cmd = parse_command(&tokenize("sort < /tmp/x"));
	assert_eq!(cmd.input_redirect, Some("/tmp/x".to_string()));
}

#[test]
fn take_flag_value_pulls_short_flag_value_and_strips_it() {
	let (value, rest) = take_flag_value("-n 2 /f", "-n");
	assert_eq!(value, Some("2".to_string()));
	assert_eq!(rest, vec!["/f".to_string()]);
}

#[test]
fn take_flag_value_supports_multi_letter_single_dash_flags() {
	let (value, rest) = take_flag_value(". -name test.rs", "-name");
	assert_eq!(value, Some("test.rs".to_string()));
	assert_eq!(rest, vec![".".to_string()]);
}

#[test]
fn take_flag_value_absent_flag_returns_none_and_full_tail() {
	let (value, rest) = take_flag_value("/f", "-n");
	assert_eq!(value, None);
	assert_eq!(rest, vec!["/f".to_string()]);
}

#[test]
fn raw_args_is_the_joined_tail() {
	let cmd = parse_command(&tokenize("head -n 5 /tmp/x"));
	assert_eq!(cmd.raw_args, "-n 5 /tmp/x");
}
