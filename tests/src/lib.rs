#[cfg(test)]
mod exploration;
