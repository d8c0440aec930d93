// dvm/src/ui.rs
//! Terminal rendering of download progress.

use std::sync::Arc;

use dvm_net::{DownloadProgress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str = "  downloading [{bar:20}] {percent}% {eta}";
const SPINNER_TEMPLATE: &str = "  downloading {spinner:.blue.bold} {bytes}";

/// Creates a hidden progress bar plus a callback that drives it from download events.
/// The bar becomes visible when the first `Started` event arrives.
pub fn download_progress() -> (ProgressCallback, ProgressBar) {
    let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
    let handle = bar.clone();
    let callback: ProgressCallback = Arc::new(move |event| apply(&handle, event));
    (callback, bar)
}

fn apply(bar: &ProgressBar, event: DownloadProgress) {
    match event {
        DownloadProgress::Started { url, total } => {
            println!("Downloading from {url}");
            match total {
                Some(len) => {
                    bar.set_length(len);
                    bar.set_style(
                        ProgressStyle::with_template(BAR_TEMPLATE)
                            .unwrap_or_else(|_| ProgressStyle::default_bar())
                            .progress_chars("= "),
                    );
                }
                None => bar.set_style(
                    ProgressStyle::with_template(SPINNER_TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                ),
            }
            bar.set_draw_target(ProgressDrawTarget::stderr());
        }
        DownloadProgress::Advanced { downloaded } => bar.set_position(downloaded),
        DownloadProgress::Finished { downloaded } => {
            bar.set_position(downloaded);
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_drive_the_bar() {
        let (callback, bar) = download_progress();
        callback(DownloadProgress::Started {
            url: "https://example.invalid/v1.0.0/deno_linux_x64.gz".to_string(),
            total: Some(100),
        });
        bar.set_draw_target(ProgressDrawTarget::hidden());
        callback(DownloadProgress::Advanced { downloaded: 40 });
        assert_eq!(bar.length(), Some(100));
        assert_eq!(bar.position(), 40);

        callback(DownloadProgress::Finished { downloaded: 100 });
        assert!(bar.is_finished());
    }
}
