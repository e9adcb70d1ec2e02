pub mod initiate;
