use social_network::{Rating, SocialNetwork};
use social_network::network::input;

use crate::args::Command;
use crate::render;

/// Run one non-interactive subcommand and return the text to print.
pub(crate) async fn execute(command: Command, net: &SocialNetwork, json: bool) -> String {
    match command {
        Command::CreateMember { name } => {
            render::write("create member", net.create_member(&name).await)
        }
        Command::CreateWork { title, authors } => match input::parse_authors(&authors) {
            Ok(authors) => render::write("create work", net.create_work(&title, &authors).await),
            Err(err) => format!("invalid input: {err}"),
        },
        Command::AddFriendship {
            requester,
            addressed,
        } => render::write(
            "add friendship",
            net.add_friendship(requester, addressed).await,
        ),
        Command::Read {
            member,
            work,
            rating,
        } => render::write(
            "record reading",
            net.read_and_rate(member, work, rating.into()).await,
        ),
        Command::Members => render::list(&net.list_members().await, json),
        Command::Works => render::list(&net.list_works().await, json),
        Command::Recommend { member } => render::items(net.recommend(member).await, json),
        Command::ReadBy { member } => render::list(&net.works_read_by(member).await, json),
        Command::RatedBy { member, ratings } => {
            let ratings: Vec<Rating> = ratings.into_iter().map(Into::into).collect();
            render::list(&net.works_rated_by(member, &ratings).await, json)
        }
        Command::ByAuthor { name } => render::list(&net.works_by_author(&name).await, json),
        Command::Readers { work } => render::list(&net.readers_of(work).await, json),
        Command::Friends { member } => render::list(&net.friends_of(member).await, json),
        Command::FriendsWhoRead { member, work } => {
            render::items(net.friends_who_also_read(member, work).await, json)
        }
        Command::Shell => "the shell runs interactively".to_string(),
    }
}
