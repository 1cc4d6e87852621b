use std::{
    env,
    fs::{self, DirBuilder, OpenOptions},
    io::{BufRead as _, BufReader, Write},
    os::unix::fs::{DirBuilderExt as _, OpenOptionsExt as _},
};

use strum::{EnumIter, EnumString, IntoEnumIterator as _, IntoStaticStr};

use crate::{
    error::ShellError,
    launch,
    util::{write_and_flush_buf, write_and_flush_str},
    Control, PROGRAM,
};

/// The builtin table. Variant order is lookup order and the order `help`
/// lists them in.
#[derive(Debug, PartialEq, EnumString, EnumIter, IntoStaticStr)]
pub enum Command {
    #[strum(serialize = "cd")]
    Cd,

    #[strum(serialize = "mkdir")]
    Mkdir,

    #[strum(serialize = "touch")]
    Touch,

    #[strum(serialize = "grep")]
    Grep,

    #[strum(serialize = "rmdir")]
    Rmdir,

    #[strum(serialize = "pwd")]
    Pwd,

    #[strum(serialize = "help")]
    Help,

    #[strum(serialize = "exit")]
    Exit,

    #[strum(disabled)]
    External { name: String },
}

impl Command {
    pub fn parse(command: &str) -> Self {
        match Self::try_from(command) {
            Ok(cmd) => cmd,
            Err(_) => Self::External {
                name: command.to_owned(),
            },
        }
    }

    /// Names of every builtin, in table order.
    pub fn builtins() -> impl Iterator<Item = &'static str> {
        Self::iter().map(<&'static str>::from)
    }

    /// Runs the command with `args` (the tokens after the command name),
    /// writing its normal output to `out`.
    pub fn execute<W: Write>(&self, args: &[String], out: &mut W) -> Result<Control, ShellError> {
        let control = match self {
            Self::Cd => Self::cd(args),
            Self::Mkdir => Self::mkdir(args),
            Self::Touch => Self::touch(args),
            Self::Grep => Self::grep(args, out),
            Self::Rmdir => Self::rmdir(args),
            Self::Pwd => Self::pwd(out),
            Self::Help => Self::help(out),
            Self::Exit => Ok(Control::Terminate),
            Self::External { name } => {
                out.flush()?;
                launch::launch(name, args)
            }
        }?;

        tracing::debug!(command = ?self, ?control, "command finished");
        Ok(control)
    }

    fn cd(args: &[String]) -> Result<Control, ShellError> {
        let dir = Self::required(args, "cd")?;
        env::set_current_dir(dir).map_err(ShellError::os("cd"))?;
        Ok(Control::Continue)
    }

    /// mkdir creates a single directory with mode 0755. The parent must exist.
    fn mkdir(args: &[String]) -> Result<Control, ShellError> {
        let path = Self::required(args, "mkdir")?;
        DirBuilder::new()
            .mode(0o755)
            .create(path)
            .map_err(ShellError::os("mkdir"))?;
        Ok(Control::Continue)
    }

    /// touch creates a new empty file with mode 0644. Unlike the usual
    /// utility, an existing file is an error and is left untouched.
    fn touch(args: &[String]) -> Result<Control, ShellError> {
        let path = Self::required(args, "touch")?;
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o644)
            .open(path)
            .map_err(ShellError::os("touch"))?;
        Ok(Control::Continue)
    }

    /// grep prints every line of the file that contains the pattern as a
    /// literal substring.
    fn grep<W: Write>(args: &[String], out: &mut W) -> Result<Control, ShellError> {
        let pattern = Self::required(args, "grep")?;
        let path = Self::required(&args[1..], "grep")?;

        let file = fs::File::open(path).map_err(ShellError::os("grep"))?;
        let reader = BufReader::new(file);

        for line in reader.split(b'\n') {
            let line = line.map_err(ShellError::os("grep"))?;
            if contains(&line, pattern.as_bytes()) {
                out.write_all(&line)?;
                out.write_all(b"\n")?;
            }
        }
        out.flush()?;
        Ok(Control::Continue)
    }

    fn rmdir(args: &[String]) -> Result<Control, ShellError> {
        let path = Self::required(args, "rmdir")?;
        fs::remove_dir(path).map_err(ShellError::os("rmdir"))?;
        Ok(Control::Continue)
    }

    fn pwd<W: Write>(out: &mut W) -> Result<Control, ShellError> {
        let path = env::current_dir().map_err(ShellError::os("pwd"))?;
        write_and_flush_buf(out, path.into_os_string().as_encoded_bytes())?;
        Ok(Control::Continue)
    }

    fn help<W: Write>(out: &mut W) -> Result<Control, ShellError> {
        let mut text = format!("{PROGRAM}\n");
        text.push_str("Type program names and arguments, and hit enter.\n");
        text.push_str("The following are built in:\n");
        for name in Self::builtins() {
            text.push_str(&format!(" {name}\n"));
        }
        text.push_str("Use the man command for information on other programs.");

        write_and_flush_str(out, &text)?;
        Ok(Control::Continue)
    }

    fn required<'a>(args: &'a [String], command: &'static str) -> Result<&'a str, ShellError> {
        args.first()
            .map(String::as_str)
            .ok_or(ShellError::MissingArgument { command })
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn path_arg(p: &std::path::Path) -> Vec<String> {
        vec![p.to_str().unwrap().to_owned()]
    }

    #[test]
    fn parse_matches_table_and_falls_back_to_external() {
        assert_eq!(Command::parse("cd"), Command::Cd);
        assert_eq!(Command::parse("grep"), Command::Grep);
        assert_eq!(Command::parse("exit"), Command::Exit);
        assert_eq!(
            Command::parse("ls"),
            Command::External { name: "ls".into() }
        );
        // Lookup is exact.
        assert_eq!(
            Command::parse("CD"),
            Command::External { name: "CD".into() }
        );
    }

    #[test]
    fn builtins_are_listed_in_table_order() {
        let names: Vec<_> = Command::builtins().collect();
        assert_eq!(
            names,
            ["cd", "mkdir", "touch", "grep", "rmdir", "pwd", "help", "exit"]
        );
    }

    #[test]
    fn exit_terminates() {
        let mut out = Vec::new();
        assert_eq!(
            Command::Exit.execute(&[], &mut out).unwrap(),
            Control::Terminate
        );
        assert!(out.is_empty());
    }

    #[test]
    fn missing_arguments_are_reported() {
        let mut out = Vec::new();
        for cmd in [
            Command::Cd,
            Command::Mkdir,
            Command::Touch,
            Command::Grep,
            Command::Rmdir,
        ] {
            let err = cmd.execute(&[], &mut out).unwrap_err();
            let missing = matches!(err, ShellError::MissingArgument { .. });
            assert!(missing, "{err}");
        }

        let argv = args(&["foo"]);
        let err = Command::Grep.execute(&argv, &mut out).unwrap_err();
        assert_eq!(err.to_string(), "expected argument to \"grep\"");
    }

    #[test]
    fn mkdir_then_rmdir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("newdir");
        let mut out = Vec::new();

        Command::Mkdir.execute(&path_arg(&dir), &mut out).unwrap();
        assert!(dir.is_dir());

        // Second create fails.
        assert!(Command::Mkdir.execute(&path_arg(&dir), &mut out).is_err());

        Command::Rmdir.execute(&path_arg(&dir), &mut out).unwrap();
        assert!(!dir.exists());
        assert!(Command::Rmdir.execute(&path_arg(&dir), &mut out).is_err());
    }

    #[test]
    fn mkdir_needs_parent() {
        let tmp = tempfile::tempdir().unwrap();
        let argv = path_arg(&tmp.path().join("a").join("b"));
        let mut out = Vec::new();
        let err = Command::Mkdir.execute(&argv, &mut out).unwrap_err();
        assert!(err.to_string().starts_with("mkdir: "), "{err}");
    }

    #[test]
    fn mkdir_sets_mode() {
        use std::os::unix::fs::PermissionsExt as _;

        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("m");
        let mut out = Vec::new();
        Command::Mkdir.execute(&path_arg(&dir), &mut out).unwrap();
        let mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
        // The process umask can only remove bits.
        assert_eq!(mode & !0o755, 0);
    }

    #[test]
    fn rmdir_refuses_non_empty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("f"), "x").unwrap();
        let argv = path_arg(tmp.path());
        let mut out = Vec::new();
        assert!(Command::Rmdir.execute(&argv, &mut out).is_err());
        assert!(tmp.path().exists());
    }

    #[test]
    fn touch_is_exclusive() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("f.txt");
        let mut out = Vec::new();

        Command::Touch.execute(&path_arg(&file), &mut out).unwrap();
        assert_eq!(fs::read(&file).unwrap(), b"");

        fs::write(&file, "keep me").unwrap();
        let argv = path_arg(&file);
        let err = Command::Touch.execute(&argv, &mut out).unwrap_err();
        assert!(err.to_string().starts_with("touch: "), "{err}");
        assert_eq!(fs::read_to_string(&file).unwrap(), "keep me");
    }

    #[test]
    fn grep_prints_matching_lines_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "foo bar\nbaz\nfoofoo\n").unwrap();

        let mut out = Vec::new();
        let mut argv = args(&["foo"]);
        argv.extend(path_arg(&file));
        let control = Command::Grep.execute(&argv, &mut out).unwrap();

        assert_eq!(control, Control::Continue);
        assert_eq!(String::from_utf8(out).unwrap(), "foo bar\nfoofoo\n");
    }

    #[test]
    fn grep_matches_literally_and_handles_missing_newline() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "a.c\nabc\nx a.c").unwrap();

        let mut out = Vec::new();
        let mut argv = args(&["a.c"]);
        argv.extend(path_arg(&file));
        Command::Grep.execute(&argv, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "a.c\nx a.c\n");
    }

    #[test]
    fn grep_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut argv = args(&["foo"]);
        argv.extend(path_arg(&tmp.path().join("nope")));
        let mut out = Vec::new();
        let err = Command::Grep.execute(&argv, &mut out).unwrap_err();
        assert!(err.to_string().starts_with("grep: "), "{err}");
        assert!(out.is_empty());
    }

    #[test]
    fn help_lists_every_builtin() {
        let mut out = Vec::new();
        Command::Help.execute(&[], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for name in Command::builtins() {
            assert!(text.contains(&format!("\n {name}\n")), "{name} missing");
        }
        assert!(text.ends_with("other programs.\n"));
    }

    #[test]
    fn extra_arguments_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("d");
        let mut argv = path_arg(&dir);
        argv.push("ignored".into());
        let mut out = Vec::new();
        Command::Mkdir.execute(&argv, &mut out).unwrap();
        assert!(dir.is_dir());
    }
}
