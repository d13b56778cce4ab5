fn main() {
	cosmograph::init_logging();
	leptos::mount::mount_to_body(cosmograph::App);
}
