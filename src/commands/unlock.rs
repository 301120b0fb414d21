use anyhow::Result;
use owo_colors::OwoColorize;
use servicebook_core::constants::PIN_LENGTH;
use servicebook_core::store::{BlobStore, RecordStore};

pub fn unlock<B: BlobStore>(store: &mut RecordStore<B>, pin: Option<String>) -> Result<()> {
    if store.is_unlocked() {
        println!("{}", "Already unlocked".dimmed());
        return Ok(());
    }

    let pin = match pin {
        Some(p) => p,
        None => rpassword::prompt_password(format!("  {PIN_LENGTH}-digit PIN: "))?,
    };

    if store.unlock(pin.trim())? {
        println!("{}", "Unlocked".green());
        Ok(())
    } else {
        anyhow::bail!("Incorrect PIN")
    }
}

pub fn lock<B: BlobStore>(store: &mut RecordStore<B>) -> Result<()> {
    store.lock()?;
    println!("{}", "Locked".green());
    Ok(())
}
