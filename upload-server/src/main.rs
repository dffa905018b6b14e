fn main() {
    upload_server::server::run();
}
