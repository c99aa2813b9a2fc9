use log::{info, warn};

use crate::caption::build_caption;
use crate::catalog_client::FreeOffer;
use crate::error::NotifierError;
use crate::notification::OfferSender;
use crate::state::SentStore;

/// Announces every offer that has not been sent before, in fetcher order.
///
/// The sent state is persisted after each successful dispatch so a crash
/// mid-run cannot re-announce offers on restart, and once more after the
/// loop so the state file is rewritten even when nothing was new. A
/// dispatch failure skips the state commit for that offer only; it is
/// retried on the next run.
pub async fn announce_new_offers(
    sender: &dyn OfferSender,
    store: &SentStore,
    offers: &[FreeOffer],
) -> Result<usize, NotifierError> {
    let mut sent = store.load();
    let mut announced = 0;

    for offer in offers {
        if sent.contains(&offer.id) {
            continue;
        }

        let caption = build_caption(offer);
        let outcome = match &offer.image_url {
            Some(image_url) => sender.send_photo(image_url, &caption).await,
            None => sender.send_message(&caption).await,
        };

        match outcome {
            Ok(()) => {
                info!("announced \"{}\" ({})", offer.title, offer.id);
                sent.insert(offer.id.clone());
                store.save(&sent)?;
                announced += 1;
            }
            Err(err) => {
                warn!("dispatch failed for \"{}\", will retry next run: {}", offer.title, err);
            }
        }
    }

    store.save(&sent)?;
    Ok(announced)
}
