//! Interactive terminal session (`concierge run`)

use std::fmt::Write as _;

use chrono::{Days, Local, NaiveDate};
use dialoguer::{Confirm, Input};

use crate::assistant::AssistantReply;
use crate::flow::{FlowStage, SearchCriteria, Selection};
use crate::pricing::{ProviderName, Shortlist};
use crate::session::{Concierge, Confirmation};
use crate::voice::AudioPlayback;

/// Drive one concierge session from terminal prompts until the user quits
///
/// # Errors
///
/// Returns error if terminal input fails
#[allow(clippy::future_not_send)]
pub async fn run(
    concierge: &mut Concierge,
    playback: Option<&AudioPlayback>,
    default_adults: u32,
) -> anyhow::Result<()> {
    println!("Hotel Concierge\n");

    loop {
        match concierge.flow().stage() {
            FlowStage::Searching => search_step(concierge, playback, default_adults).await?,
            FlowStage::Selecting => select_step(concierge, playback).await?,
            FlowStage::Confirming => {
                let again = Confirm::new()
                    .with_prompt("Start a new search?")
                    .default(true)
                    .interact()?;
                if !again {
                    return Ok(());
                }
                concierge.start_new_search()?;
            }
        }
    }
}

#[allow(clippy::future_not_send)]
async fn search_step(
    concierge: &mut Concierge,
    playback: Option<&AudioPlayback>,
    default_adults: u32,
) -> anyhow::Result<()> {
    let city: String = Input::new()
        .with_prompt("City or location")
        .allow_empty(true)
        .interact_text()?;

    let today = Local::now().date_naive();
    let check_in: NaiveDate = Input::new()
        .with_prompt("Check-in date (YYYY-MM-DD)")
        .default(today)
        .interact_text()?;
    let check_out: NaiveDate = Input::new()
        .with_prompt("Check-out date (YYYY-MM-DD)")
        .default(check_in.checked_add_days(Days::new(1)).unwrap_or(check_in))
        .validate_with(move |date: &NaiveDate| {
            if *date > check_in {
                Ok(())
            } else {
                Err("check-out must be after check-in")
            }
        })
        .interact_text()?;
    let adults: u32 = Input::new()
        .with_prompt("Adults")
        .default(default_adults)
        .validate_with(|n: &u32| {
            if (1..=SearchCriteria::MAX_ADULTS).contains(n) {
                Ok(())
            } else {
                Err("adults must be between 1 and 10")
            }
        })
        .interact_text()?;

    if concierge.voice_input() && ask_to_record("Record your search query?")? {
        match concierge.listen_for_query().await? {
            Some(transcript) => println!("Recognized: {transcript}"),
            None => println!("Nothing recognized, type your query instead"),
        }
    }

    let typed: String = Input::new()
        .with_prompt("Search query (optional)")
        .allow_empty(true)
        .interact_text()?;
    concierge.type_query(typed)?;

    let criteria = SearchCriteria::new(city, check_in, check_out, adults);
    let outcome = match concierge.search(criteria).await {
        Ok(outcome) => outcome,
        Err(signal) => {
            println!("{signal}\n");
            return Ok(());
        }
    };

    match &outcome.reply {
        AssistantReply::Answer(answer) => {
            println!("\nAssistant response:\n{answer}\n");
            play(playback, outcome.reply_audio.as_deref());
        }
        AssistantReply::Failed(message) => eprintln!("{message}\n"),
    }

    match outcome.hotels {
        Ok(()) => {
            if let Some(shortlist) = concierge.flow().shortlist() {
                println!("{}", format_shortlist(shortlist));
            }
        }
        Err(signal) => println!("{signal}\n"),
    }

    Ok(())
}

#[allow(clippy::future_not_send)]
async fn select_step(
    concierge: &mut Concierge,
    playback: Option<&AudioPlayback>,
) -> anyhow::Result<()> {
    let Some(criteria) = concierge.flow().criteria().cloned() else {
        return Ok(());
    };

    let hotel_name = voice_or_text(concierge, "Record the hotel name?", "Hotel name").await?;
    let user_name = voice_or_text(concierge, "Record your full name?", "Your full name").await?;

    let selection = Selection {
        hotel_name,
        user_name,
        check_in: criteria.check_in,
        check_out: criteria.check_out,
    };

    match concierge.book(&selection).await {
        Ok(confirmation) => show_confirmation(&confirmation, playback),
        Err(signal) => {
            println!("{signal}\n");
            if let Some(shortlist) = concierge.flow().shortlist() {
                println!("{}", format_shortlist(shortlist));
            }
        }
    }

    Ok(())
}

/// Prompt for text, pre-filled with a transcript when the user chooses to speak
async fn voice_or_text(
    concierge: &Concierge,
    record_prompt: &str,
    text_prompt: &str,
) -> anyhow::Result<String> {
    let mut initial = String::new();
    if concierge.voice_input() && ask_to_record(record_prompt)? {
        match concierge.listen().await {
            Some(transcript) => {
                println!("Recognized: {transcript}");
                initial = transcript;
            }
            None => println!("Nothing recognized"),
        }
    }

    let text: String = Input::new()
        .with_prompt(text_prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?;
    Ok(text)
}

fn ask_to_record(prompt: &str) -> anyhow::Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

fn show_confirmation(confirmation: &Confirmation, playback: Option<&AudioPlayback>) {
    println!("\nBooking confirmed at {}!", confirmation.draft.hotel_name);
    println!("{}", confirmation.message);
    play(playback, confirmation.message_audio.as_deref());

    match &confirmation.receipt {
        Ok(path) => println!("Receipt saved to {}\n", path.display()),
        Err(e) => eprintln!("Receipt could not be written: {e}\n"),
    }
}

fn play(playback: Option<&AudioPlayback>, audio: Option<&[u8]>) {
    let (Some(playback), Some(audio)) = (playback, audio) else {
        return;
    };

    if let Err(e) = tokio::task::block_in_place(|| playback.play_mp3(audio)) {
        tracing::warn!(error = %e, "failed to play audio");
    }
}

/// Render the shortlist as a fixed-width comparison table
#[must_use]
pub fn format_shortlist(shortlist: &Shortlist) -> String {
    let mut out = format!("{:<4}{:<32}{:>7}{:>12}", "#", "Name", "Rating", "Min Price");
    for provider in ProviderName::ALL {
        let _ = write!(out, "{:>14}", provider.display_name());
    }
    out.push('\n');

    for (i, hotel) in shortlist.iter().enumerate() {
        let min_price = format!("₹{}", hotel.min_price);
        let _ = write!(
            out,
            "{:<4}{:<32}{:>7}{min_price:>12}",
            i + 1,
            hotel.name,
            hotel.rating,
        );
        for provider in ProviderName::ALL {
            let price = hotel
                .price_for(provider)
                .map_or_else(|| "-".to_string(), |p| p.to_string());
            let _ = write!(out, "{price:>14}");
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{RatePerNight, RawHotelRecord, rank};

    #[test]
    fn test_format_shortlist() {
        let record = RawHotelRecord {
            name: Some("Taj".to_string()),
            address: Some("MG Road".to_string()),
            overall_rating: Some(4.5),
            rate_per_night: Some(RatePerNight {
                extracted_lowest: Some(serde_json::json!(1000)),
            }),
            category: Some("hotel".to_string()),
        };

        let table = format_shortlist(&rank(&[record]));
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Booking.com"));
        assert!(lines[0].contains("Trivago"));
        assert!(lines[1].starts_with("1   Taj"));
        assert!(lines[1].contains("₹980.00"));
        assert!(lines[1].contains("1050.00"));
    }
}
