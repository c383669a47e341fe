use bb84_core::otp;

pub fn encrypt(key: &str, text: &str) -> Result<(), String> {
    let cipher = otp::encrypt(text, key).map_err(|e| e.to_string())?;
    println!("event=otp_encrypt bits={}", text.len() * 8);
    println!("cipher={cipher}");
    Ok(())
}

pub fn decrypt(key: &str, cipher: &str) -> Result<(), String> {
    let text = otp::decrypt(cipher, key).map_err(|e| e.to_string())?;
    println!("event=otp_decrypt bits={}", text.len() * 8);
    println!("text={text}");
    Ok(())
}
