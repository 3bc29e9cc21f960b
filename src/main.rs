use widget_loader::error::AppResult;

fn main() -> AppResult<()> {
    widget_loader::entry::run()
}
