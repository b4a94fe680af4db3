pub mod clarifai_provider;
