use awsomarchy_installer::cli;

#[tokio::main]
async fn main() {
    // Enable ANSI colors on Windows terminals.
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let code = cli::run().await;
    if code != 0 {
        std::process::exit(code);
    }
}
