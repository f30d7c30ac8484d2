//! Interactive command loop.
//!
//! The console reads one command per line from any [`BufRead`] and writes
//! colored output to any [`Write`], so the same loop serves stdin/stdout and
//! in-memory buffers in tests. Failures of individual commands are printed and
//! the loop continues; only `exit` or end of input stops it.
use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::attributes::MembershipAttributes;
use crate::io::LoadError;
use crate::report::{render_detection, render_edges, render_entry, render_nodes};
use crate::session::{Session, SessionError};

pub const DEFAULT_NODES_FILE: &str = "nodes.csv";
pub const DEFAULT_EDGES_FILE: &str = "edges.csv";

const BANNER: &str = r#"
 _     ____    _    ____  _
| |   |  _ \  / \  |  _ \| |   _   _ _ __ __  __    /\_/\
| |   | | | |/ _ \ | |_) | |  | | | | '_ \\ \/ /   ( o.o )
| |___| |_| / ___ \|  __/| |__| |_| | | | |>  <     > ^ <
|_____|____/_/   \_\_|   |_____\__, |_| |_/_/\_\
                               |___/
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Load(Option<String>),
    SetAttrs(Option<String>),
    Parse,
    ViewNodes,
    ViewEdges,
    ViewGroup(Option<String>),
    Export(Vec<String>),
    Exit,
    Unknown(String),
}

impl Command {
    /// Parse one input line. Returns `None` for blank lines. The first word
    /// is the command; the rest of the line (trimmed) is its argument.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, Some(r.trim()).filter(|r| !r.is_empty())),
            None => (line, None),
        };
        let arg = rest.map(str::to_string);
        Some(match cmd {
            "help" => Command::Help,
            "load" => Command::Load(arg),
            "set_attrs" => Command::SetAttrs(arg),
            "parse" => Command::Parse,
            "view_nodes" => Command::ViewNodes,
            "view_edges" => Command::ViewEdges,
            "view_group" => Command::ViewGroup(arg),
            "export" => Command::Export(
                rest.map(|r| r.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default(),
            ),
            "exit" => Command::Exit,
            other => Command::Unknown(other.to_string()),
        })
    }
}

pub struct Console<R, W> {
    session: Session,
    input: R,
    out: W,
    confirm_attributes: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(session: Session, input: R, out: W) -> Self {
        Self {
            session,
            input,
            out,
            confirm_attributes: true,
        }
    }

    /// When disabled, `load` reports detected attributes but keeps the
    /// configured ones without prompting.
    pub fn confirm_attributes(mut self, confirm: bool) -> Self {
        self.confirm_attributes = confirm;
        self
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", BANNER.bold().green())?;
        writeln!(
            self.out,
            "{}",
            "LDAPLynx Console - Type 'help' for a list of commands.".green()
        )
    }

    /// Read and execute commands until `exit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.out, "{}", "LDAPLynx> ".cyan())?;
            self.out.flush()?;
            let Some(line) = self.read_line()? else {
                writeln!(self.out)?;
                break;
            };
            let Some(cmd) = Command::parse(&line) else {
                continue;
            };
            if !self.execute(cmd)? {
                break;
            }
        }
        Ok(())
    }

    /// Run one command. Returns `false` when the console should stop.
    pub fn execute(&mut self, cmd: Command) -> io::Result<bool> {
        log::debug!("console command: {:?}", cmd);
        match cmd {
            Command::Help => self.help()?,
            Command::Load(None) => {
                self.warn("Usage: load <file_path>")?;
                self.warn("Example: load demo_ldap_data.ldif")?;
            }
            Command::Load(Some(path)) => self.load(&path)?,
            Command::SetAttrs(None) => {
                self.warn("Usage: set_attrs <attributes>")?;
                self.warn("Example: set_attrs member,memberUid")?;
            }
            Command::SetAttrs(Some(list)) => {
                self.session
                    .set_attributes(MembershipAttributes::parse_list(&list));
                let msg = format!(
                    "Membership attributes set to: {}",
                    self.session.attributes()
                );
                self.success(&msg)?;
            }
            Command::Parse => {
                let parsed = self
                    .session
                    .parse()
                    .map(|g| (g.nodes.len(), g.edges.len()));
                match parsed {
                    Ok((nodes, edges)) => self.success(&format!(
                        "Parsed {nodes} nodes and {edges} edges. Ready for export."
                    ))?,
                    Err(e) => self.failure(&e)?,
                }
            }
            Command::ViewNodes => {
                let rendered = self
                    .session
                    .nodes()
                    .map(|n| (!n.is_empty()).then(|| render_nodes(n)));
                match rendered {
                    Ok(Some(s)) => write!(self.out, "{s}")?,
                    Ok(None) => self.error("No nodes available. Run 'parse' first.")?,
                    Err(e) => self.failure(&e)?,
                }
            }
            Command::ViewEdges => {
                let rendered = self
                    .session
                    .edges()
                    .map(|e| (!e.is_empty()).then(|| render_edges(e)));
                match rendered {
                    Ok(Some(s)) => write!(self.out, "{s}")?,
                    Ok(None) => self.error("No edges available. Run 'parse' first.")?,
                    Err(e) => self.failure(&e)?,
                }
            }
            Command::ViewGroup(None) => self.error("Usage: view_group <group_dn>")?,
            Command::ViewGroup(Some(dn)) => {
                let rendered = self
                    .session
                    .entry(&dn)
                    .map(|found| found.map(|entry| render_entry(&entry)));
                match rendered {
                    Ok(Some(s)) => write!(self.out, "{s}")?,
                    Ok(None) => self.error(&format!("Group '{dn}' not found."))?,
                    Err(e) => self.failure(&e)?,
                }
            }
            Command::Export(files) => match files.as_slice() {
                [] => self.export(DEFAULT_NODES_FILE, DEFAULT_EDGES_FILE)?,
                [nodes, edges] => self.export(nodes, edges)?,
                _ => self.error("Usage: export <nodes_file> <edges_file>")?,
            },
            Command::Exit => {
                self.success("Exiting LDAPLynx Console.")?;
                return Ok(false);
            }
            Command::Unknown(cmd) => self.error(&format!(
                "Unknown command: {cmd}. Type 'help' for a list of commands."
            ))?,
        }
        Ok(true)
    }

    fn load(&mut self, path: &str) -> io::Result<()> {
        let loaded = self.session.load(path).map(|_| ());
        match loaded {
            Ok(()) => self.success(&format!("LDIF file '{path}' loaded successfully."))?,
            Err(SessionError::Load(LoadError::NotFound(_))) => {
                return self.error(&format!("Error: The file '{path}' does not exist."));
            }
            Err(e) => return self.error(&format!("An error occurred: {e}")),
        }

        let detected = match self.session.detect() {
            Ok(found) => MembershipAttributes::new(found),
            Err(e) => return self.failure(&e),
        };
        if detected.is_empty() {
            writeln!(self.out)?;
            self.warn("No membership attributes detected.")?;
            if self.confirm_attributes {
                self.ask_for_attributes()?;
            }
        } else {
            let previews = match self.session.group_previews(&detected) {
                Ok(p) => p,
                Err(e) => return self.failure(&e),
            };
            write!(self.out, "{}", render_detection(&previews, &detected))?;
            if self.confirm_attributes {
                self.warn("Do you want to use these attributes? (y/n)")?;
                match self.prompt()? {
                    Some(answer) if answer.eq_ignore_ascii_case("y") => {
                        self.session.set_attributes(detected);
                    }
                    Some(_) => self.ask_for_attributes()?,
                    None => {}
                }
            }
        }

        let msg = format!(
            "Using membership attribute(s): {}",
            self.session.attributes()
        );
        self.success(&msg)?;
        self.success("Ready to parse.")
    }

    fn ask_for_attributes(&mut self) -> io::Result<()> {
        self.warn("Enter your preferred membership attributes (comma-separated):")?;
        if let Some(list) = self.prompt()? {
            self.session
                .set_attributes(MembershipAttributes::parse_list(&list));
        }
        Ok(())
    }

    fn export(&mut self, nodes: &str, edges: &str) -> io::Result<()> {
        match self.session.export(nodes, edges) {
            Ok(()) => self.success(&format!("Files saved: '{nodes}' and '{edges}'")),
            Err(e) => self.failure(&e),
        }
    }

    fn help(&mut self) -> io::Result<()> {
        let y = |s: &str| s.yellow().to_string();
        let text = format!(
            "
{}
  1. {} Use 'load <file_path>' to load an LDIF file.
  2. {} Use 'parse' to analyze the loaded data.
  3. {} Use 'export' to save nodes and edges to CSV files.

  {} You can use the following command (assuming ldapsearch is installed):
  {}

  {}     - Load an LDIF file.
  {}    - Set membership attributes (comma-separated).
  {}                - Parse the loaded LDIF file.
  {}           - View parsed nodes.
  {}           - View parsed edges.
  {} - View details of a specific group by its DN.
  {} - Export nodes and edges to CSV files (default: {} and {}).
  {}                 - Exit the console.
",
            y("Usage Instructions:"),
            y("Load an LDIF file:"),
            y("Parse the LDIF file:"),
            y("Export parsed data:"),
            y("To generate an LDIF file:"),
            y("ldapsearch -x -H ldap://localhost -b dc=example,dc=com > output.ldif"),
            y("load <file_path>"),
            y("set_attrs <attrs>"),
            y("parse"),
            y("view_nodes"),
            y("view_edges"),
            y("view_group <group_dn>"),
            y("export <nfile> <efile>"),
            DEFAULT_NODES_FILE,
            DEFAULT_EDGES_FILE,
            y("exit"),
        );
        writeln!(self.out, "{text}")
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    fn prompt(&mut self) -> io::Result<Option<String>> {
        write!(self.out, "> ")?;
        self.out.flush()?;
        self.read_line()
    }

    fn success(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.out, "{}", msg.green())
    }

    fn warn(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.out, "{}", msg.yellow())
    }

    fn error(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.out, "{}", msg.red())
    }

    fn failure(&mut self, err: &SessionError) -> io::Result<()> {
        log::debug!("command failed: {err:?}");
        let msg = match err {
            SessionError::NoDocument => "No LDIF file loaded. Use the 'load' command first.".to_string(),
            SessionError::NoGraph => "No parsed data available. Run 'parse' first.".to_string(),
            other => other.to_string(),
        };
        self.error(&msg)
    }
}
