//! Line-oriented control loop commands. Stands in for the REST/socket adapters that
//! are out of scope for the core, just enough to drive a `TownRegistry` end to end
//! from a terminal.

use town_core::{
    BoundingBox, Location, NewConversationArea, Player, Rotation, SessionToken, TownController,
    TownRegistry,
};

use crate::config;

/// Everything a command handler needs: the shared registry and the raw argument
/// parts after the command name.
pub struct CommandContext<'a> {
    pub registry: &'a TownRegistry,
    pub parts: &'a [&'a str],
}

/// The result of a command: `Ok(())` prints nothing extra, `Err(Some(message))`
/// prints the message, `Err(None)` prints the command's usage.
pub type CommandResult = Result<(), Option<String>>;

/// Dispatch a line of input to the matching command, printing its outcome.
pub fn handle_command(line: &str, registry: &TownRegistry) {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let Some(&name) = parts.first() else {
        return;
    };

    for cmd in COMMANDS {
        if cmd.name == name {
            let res = (cmd.handler)(CommandContext { registry, parts: &parts[1..] });
            match res {
                Err(Some(message)) => println!("error: {message}"),
                Err(None) => println!("usage: {} {}", cmd.name, cmd.usage),
                Ok(()) => {}
            }
            return;
        }
    }

    println!("unknown command {name:?}, type `help`");
}

struct Command {
    name: &'static str,
    usage: &'static str,
    description: &'static str,
    handler: fn(CommandContext) -> CommandResult,
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "",
        description: "list available commands",
        handler: cmd_help,
    },
    Command {
        name: "create",
        usage: "<friendly-name> [public|private]",
        description: "create a new town",
        handler: cmd_create,
    },
    Command {
        name: "towns",
        usage: "",
        description: "list publicly listed towns",
        handler: cmd_towns,
    },
    Command {
        name: "join",
        usage: "<town-id> <username>",
        description: "add a player to a town, printing its session token",
        handler: cmd_join,
    },
    Command {
        name: "move",
        usage: "<session-token> <x> <y> [conversation-label]",
        description: "move a player, optionally asserting a conversation area label",
        handler: cmd_move,
    },
    Command {
        name: "area",
        usage: "<session-token> <label> <topic> <x> <y> <width> <height>",
        description: "create a conversation area",
        handler: cmd_area,
    },
    Command {
        name: "leave",
        usage: "<session-token>",
        description: "destroy a session",
        handler: cmd_leave,
    },
    Command {
        name: "delete",
        usage: "<town-id> <password>",
        description: "delete a town",
        handler: cmd_delete,
    },
];

fn cmd_help(_ctx: CommandContext) -> CommandResult {
    println!("available commands:");
    for cmd in COMMANDS {
        println!("  {:<8} {:<45} {}", cmd.name, cmd.usage, cmd.description);
    }
    Ok(())
}

fn cmd_create(ctx: CommandContext) -> CommandResult {
    let [name, visibility @ ..] = ctx.parts else { return Err(None) };
    let is_public = match visibility {
        [] => config::default_public(),
        ["public"] => true,
        ["private"] => false,
        _ => return Err(None),
    };

    let (controller, password) = ctx.registry.create_town(
        name.to_string(),
        is_public,
        config::default_max_occupancy(),
    );
    crate::server::attach_logging_listener(&controller);

    println!("created town {} (password {password})", controller.id());
    Ok(())
}

fn cmd_towns(ctx: CommandContext) -> CommandResult {
    let listings = ctx.registry.list_towns();
    if listings.is_empty() {
        println!("no publicly listed towns");
    }
    for listing in listings {
        println!(
            "{} {:<20} {}/{}",
            listing.town_id, listing.friendly_name, listing.current_occupancy, listing.max_occupancy,
        );
    }
    Ok(())
}

fn cmd_join(ctx: CommandContext) -> CommandResult {
    let [town_id, username] = ctx.parts else { return Err(None) };

    let Some(controller) = ctx.registry.get_controller_for_town(town_id) else {
        return Err(Some(format!("no such town {town_id}")));
    };

    let player = Player::new(username.to_string(), Location::new(0.0, 0.0, Rotation::Front, false));
    match controller.add_player(player) {
        Ok(session) => {
            println!("joined as {} (session {})", session.player_id, session.token);
            Ok(())
        }
        Err(err) => Err(Some(err.to_string())),
    }
}

fn cmd_move(ctx: CommandContext) -> CommandResult {
    let (token, x, y, label) = match ctx.parts {
        [token, x, y] => (token, x, y, None),
        [token, x, y, label] => (token, x, y, Some(*label)),
        _ => return Err(None),
    };

    let (Ok(x), Ok(y)) = (x.parse::<f64>(), y.parse::<f64>()) else {
        return Err(Some("x and y must be numbers".to_string()));
    };

    let Some((controller, session)) = resolve_session(ctx.registry, token) else {
        return Err(Some(format!("no such session {token}")));
    };

    let mut location = Location::new(x, y, Rotation::Front, true);
    if let Some(label) = label {
        location = location.with_conversation_label(label);
    }

    controller.update_player_location(&session.player_id, location);
    Ok(())
}

fn cmd_area(ctx: CommandContext) -> CommandResult {
    let [token, label, topic, x, y, width, height] = ctx.parts else { return Err(None) };

    let (Ok(x), Ok(y), Ok(width), Ok(height)) =
        (x.parse(), y.parse(), width.parse(), height.parse())
    else {
        return Err(Some("x, y, width and height must be numbers".to_string()));
    };

    let Some((controller, _session)) = resolve_session(ctx.registry, token) else {
        return Err(Some(format!("no such session {token}")));
    };

    let accepted = controller.add_conversation_area(NewConversationArea::new(
        *label,
        *topic,
        BoundingBox::new(x, y, width, height),
    ));

    if accepted {
        Ok(())
    } else {
        Err(Some(format!("Unable to create conversation area {label} with topic {topic}")))
    }
}

fn cmd_leave(ctx: CommandContext) -> CommandResult {
    let [token] = ctx.parts else { return Err(None) };
    let Some((controller, session)) = resolve_session(ctx.registry, token) else {
        return Err(Some(format!("no such session {token}")));
    };
    controller.destroy_session(&session.token);
    Ok(())
}

fn cmd_delete(ctx: CommandContext) -> CommandResult {
    let [town_id, password] = ctx.parts else { return Err(None) };
    if ctx.registry.delete_town(town_id, password) {
        Ok(())
    } else {
        Err(Some("wrong town id or password".to_string()))
    }
}

/// Session tokens don't carry their town id to the CLI, so resolving one means
/// scanning every known town (public or not) and checking its sessions. A real
/// transport adapter instead keeps the `(town, session)` pair from the join
/// handshake.
fn resolve_session(
    registry: &TownRegistry,
    token: &str,
) -> Option<(std::sync::Arc<TownController>, town_core::Session)> {
    let token: SessionToken = token.into();
    for town_id in registry.town_ids() {
        if let Some(controller) = registry.get_controller_for_town(&town_id) {
            if let Some(session) = controller.get_session_by_token(&token) {
                return Some((controller, session));
            }
        }
    }
    None
}
