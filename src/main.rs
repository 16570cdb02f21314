use anyhow::Result;

use poptop::commands::dashboard;

fn main() -> Result<()> {
    let matches = dashboard::command().get_matches();
    dashboard::execute(&matches)
}
