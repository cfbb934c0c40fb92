use scandock::app;

fn main() {
    app::startup::startup();
}
