use std::io::{self, Write};

use social_network::network::input;
use social_network::{Rating, SocialDbError, SocialNetwork};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::render;

const MENU: &str = "\
Main menu
 1. Register a member
 2. Create a work
 3. Add a friendship
 4. Mark a work as read by a member and rate it
 5. List members
 6. List works
 7. Recommend a work to a member
 8. List works read by a member
 9. List works rated by a member
10. List members who read a work
11. List friends of a member
12. List friends of a member who read a work
 0. Quit";

/// The numbered interactive menu. Reads one choice per line, then whatever
/// that choice needs, until `0`, end of input or cancellation.
pub(crate) struct Shell<'a, R, W> {
    net: &'a SocialNetwork,
    lines: Lines<R>,
    out: W,
    json: bool,
}

impl<'a, R, W> Shell<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub(crate) fn new(net: &'a SocialNetwork, reader: R, out: W, json: bool) -> Self {
        Self {
            net,
            lines: reader.lines(),
            out,
            json,
        }
    }

    pub(crate) async fn run(mut self) -> io::Result<()> {
        loop {
            writeln!(self.out, "\n{MENU}")?;
            let Some(choice) = self.prompt("Choice:").await? else {
                return Ok(());
            };
            let reply = match choice.trim() {
                "0" | "q" | "quit" => return Ok(()),
                "1" => self.create_member().await?,
                "2" => self.create_work().await?,
                "3" => self.add_friendship().await?,
                "4" => self.read_and_rate().await?,
                "5" => Some(render::list(&self.net.list_members().await, self.json)),
                "6" => Some(render::list(&self.net.list_works().await, self.json)),
                "7" => self.with_member(Action::Recommend).await?,
                "8" => self.with_member(Action::ReadBy).await?,
                "9" => self.with_member(Action::RatedBy).await?,
                "10" => self.readers().await?,
                "11" => self.with_member(Action::Friends).await?,
                "12" => self.friends_who_read().await?,
                _ => Some("unknown option, try again".to_string()),
            };
            match reply {
                Some(text) => writeln!(self.out, "{text}")?,
                None => return Ok(()),
            }
        }
    }

    /// Print `question` and read the next line. `None` on end of input or
    /// cancellation.
    async fn prompt(&mut self, question: &str) -> io::Result<Option<String>> {
        writeln!(self.out, "{question}")?;
        self.out.flush()?;
        let cancel = self.net.cancellation_token().clone();
        tokio::select! {
            line = self.lines.next_line() => line,
            () = cancel.cancelled() => Ok(None),
        }
    }

    /// Prompt, then parse the answer. The outer `None` means the session is
    /// over.
    async fn ask<T>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> Result<T, SocialDbError>,
    ) -> io::Result<Option<Result<T, String>>> {
        Ok(self
            .prompt(question)
            .await?
            .map(|line| parse(&line).map_err(|err| format!("invalid input: {err}"))))
    }

    async fn create_member(&mut self) -> io::Result<Option<String>> {
        let Some(name) = self.prompt("Name of the new member:").await? else {
            return Ok(None);
        };
        if name.trim().is_empty() {
            return Ok(Some("invalid input: empty name".into()));
        }
        let ok = self.net.create_member(&name).await;
        Ok(Some(render::write("create member", ok)))
    }

    async fn create_work(&mut self) -> io::Result<Option<String>> {
        let Some(title) = self.prompt("Title of the new work:").await? else {
            return Ok(None);
        };
        if title.trim().is_empty() {
            return Ok(Some("invalid input: empty title".into()));
        }
        let Some(authors) = self
            .ask("Authors, comma separated:", input::parse_authors)
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(match authors {
            Ok(authors) => render::write("create work", self.net.create_work(&title, &authors).await),
            Err(reason) => reason,
        }))
    }

    async fn add_friendship(&mut self) -> io::Result<Option<String>> {
        let Some(pair) = self
            .ask("Two member ids separated by a space (e.g. '1 2'):", input::parse_id_pair)
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(match pair {
            Ok((requester, addressed)) => render::write(
                "add friendship",
                self.net.add_friendship(requester, addressed).await,
            ),
            Err(reason) => reason,
        }))
    }

    async fn read_and_rate(&mut self) -> io::Result<Option<String>> {
        let Some(reading) = self
            .ask(
                "Member id, work id and rating (1 nothing, 2 little, 3 a lot), e.g. '1 2 3':",
                input::parse_reading,
            )
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(match reading {
            Ok((member, work, rating)) => render::write(
                "record reading",
                self.net.read_and_rate(member, work, rating).await,
            ),
            Err(reason) => reason,
        }))
    }

    async fn with_member(&mut self, action: Action) -> io::Result<Option<String>> {
        let Some(member) = self.ask("Member id:", input::parse_id).await? else {
            return Ok(None);
        };
        let member = match member {
            Ok(member) => member,
            Err(reason) => return Ok(Some(reason)),
        };
        let json = self.json;
        Ok(Some(match action {
            Action::Recommend => render::items(self.net.recommend(member).await, json),
            Action::ReadBy => render::list(&self.net.works_read_by(member).await, json),
            Action::RatedBy => {
                render::list(&self.net.works_rated_by(member, &Rating::ALL).await, json)
            }
            Action::Friends => render::list(&self.net.friends_of(member).await, json),
        }))
    }

    async fn readers(&mut self) -> io::Result<Option<String>> {
        let Some(work) = self.ask("Work id:", input::parse_id).await? else {
            return Ok(None);
        };
        Ok(Some(match work {
            Ok(work) => render::list(&self.net.readers_of(work).await, self.json),
            Err(reason) => reason,
        }))
    }

    async fn friends_who_read(&mut self) -> io::Result<Option<String>> {
        let Some(pair) = self
            .ask("Member id and work id (e.g. '1 2'):", input::parse_id_pair)
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(match pair {
            Ok((member, work)) => {
                render::items(self.net.friends_who_also_read(member, work).await, self.json)
            }
            Err(reason) => reason,
        }))
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Recommend,
    ReadBy,
    RatedBy,
    Friends,
}
