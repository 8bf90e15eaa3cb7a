use log::info;
use std::io;

/// URL a domain card points at.
pub fn visit_url(domain: &str) -> String {
    format!("https://{}", domain.trim())
}

/// Opens the domain in the system's default browser
pub fn open_domain(domain: &str) -> io::Result<()> {
    if domain.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Cannot open an empty domain",
        ));
    }

    let url = visit_url(domain);
    info!("Opening {}", url);
    open::that_detached(&url)
}
