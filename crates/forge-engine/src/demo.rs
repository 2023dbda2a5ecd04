//! Request script run by the demo driver.

use std::io::{self, Write};

use forge_tools::{Command, FrontController, Request, Response};

/// The built-in request script.
#[must_use]
pub fn default_script() -> Vec<Request> {
    vec![
        Request::new(Command::CreateEntity.name()).with_param("spider"),
        Request::new(Command::CreateEntity.name()).with_param("spider_warrior"),
        Request::new(Command::CreateEntity.name()).with_param("npc_villager"),
        Request::new(Command::CreateMonster.name()).with_param("spider"),
        Request::new(Command::BulkCreate.name())
            .with_param("spider")
            .with_param(2),
        Request::new(Command::SpawnInstance.name()).with_param("spider_warrior"),
        Request::new("bogus"),
    ]
}

/// Runs every request in order, writing one block per result to `out`.
///
/// Failed requests print `<command>: no result`; they never stop the script.
pub fn run_script<W: Write>(
    controller: &FrontController,
    requests: &[Request],
    show_details: bool,
    out: &mut W,
) -> io::Result<Vec<Option<Response>>> {
    let mut results = Vec::with_capacity(requests.len());
    for request in requests {
        let response = controller.dispatch_request(request);
        match (&response, show_details) {
            (Some(response), true) => writeln!(out, "{}:\n{response}", request.command)?,
            (Some(_), false) => writeln!(out, "{}: ok", request.command)?,
            (None, _) => writeln!(out, "{}: no result", request.command)?,
        }
        results.push(response);
    }
    Ok(results)
}
