mod answer_csv;
mod command;
mod store;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
